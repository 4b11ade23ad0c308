//! Google Sheets v4 backend.
//!
//! Authenticates as a service account: a short-lived RS256 JWT assertion is
//! exchanged for an access token, which is reused until a minute before it
//! expires. Requests run on a private current-thread tokio runtime, so the
//! store exposes the same blocking interface as the local backends.

use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};

use super::credentials::ServiceAccountKey;
use super::{column_letters, TabularStore};
use crate::error::StoreError;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// How requests are authorized.
#[derive(Debug, Clone)]
pub enum SheetsAuth {
    ServiceAccount(ServiceAccountKey),
    /// Pre-issued access token.
    Bearer(String),
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

struct AccessToken {
    value: String,
    expires_at: i64,
}

pub struct SheetsStore {
    spreadsheet_id: String,
    base_url: String,
    auth: SheetsAuth,
    token: Option<AccessToken>,
    sheet_ids: HashMap<String, i64>,
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl SheetsStore {
    pub fn new(spreadsheet_id: impl Into<String>, auth: SheetsAuth) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;
        Ok(Self {
            spreadsheet_id: spreadsheet_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auth,
            token: None,
            sheet_ids: HashMap::new(),
            client: Client::new(),
            runtime,
        })
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn access_token(&mut self) -> Result<String, StoreError> {
        let key = match &self.auth {
            SheetsAuth::Bearer(token) => return Ok(token.clone()),
            SheetsAuth::ServiceAccount(key) => key.clone(),
        };

        let now = Utc::now().timestamp();
        if let Some(token) = &self.token {
            if now < token.expires_at - 60 {
                return Ok(token.value.clone());
            }
        }

        let claims = Claims {
            iss: &key.client_email,
            scope: SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| StoreError::Auth(format!("invalid private key: {e}")))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {e}")))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];
        let body: Value = self.runtime.block_on(async {
            self.client
                .post(&key.token_uri)
                .form(&params)
                .send()
                .await?
                .json()
                .await
        })?;

        if let Some(error) = body.get("error") {
            return Err(StoreError::Auth(format!("token exchange failed: {error}")));
        }
        let value = body["access_token"]
            .as_str()
            .ok_or_else(|| StoreError::Auth("token response without access_token".into()))?
            .to_string();
        let expires_in = body
            .get("expires_in")
            .and_then(Value::as_i64)
            .unwrap_or(TOKEN_LIFETIME_SECS);

        tracing::debug!(account = %key.client_email, "obtained sheets access token");
        self.token = Some(AccessToken {
            value: value.clone(),
            expires_at: now + expires_in,
        });
        Ok(value)
    }

    fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, StoreError> {
        let token = self.access_token()?;
        let url = format!(
            "{}/v4/spreadsheets/{}{}",
            self.base_url, self.spreadsheet_id, path
        );

        let (status, text) = self.runtime.block_on(async {
            let mut req = self.client.request(method, &url).bearer_auth(&token);
            if let Some(body) = &body {
                req = req.json(body);
            }
            let resp = req.send().await?;
            let status = resp.status();
            let text = resp.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(text);
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Remote {
            status: status.as_u16(),
            message: format!("unexpected response body: {e}"),
        })
    }

    fn sheet_id(&mut self, sheet: &str) -> Result<i64, StoreError> {
        if !self.sheet_ids.contains_key(sheet) {
            self.worksheets()?;
        }
        self.sheet_ids
            .get(sheet)
            .copied()
            .ok_or_else(|| StoreError::WorksheetNotFound(sheet.to_string()))
    }
}

/// A1 reference for a whole worksheet, quoted so names with spaces work.
fn sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

fn encoded(range: &str) -> String {
    urlencoding::encode(range).into_owned()
}

impl TabularStore for SheetsStore {
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
        let body = self.request(Method::GET, "?fields=sheets.properties", None)?;
        let mut names = Vec::new();
        self.sheet_ids.clear();
        for sheet in body["sheets"].as_array().into_iter().flatten() {
            let props = &sheet["properties"];
            if let Some(title) = props["title"].as_str() {
                self.sheet_ids
                    .insert(title.to_string(), props["sheetId"].as_i64().unwrap_or(0));
                names.push(title.to_string());
            }
        }
        Ok(names)
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let path = format!("/values/{}", encoded(&sheet_range(sheet)));
        let body = match self.request(Method::GET, &path, None) {
            Err(StoreError::Remote {
                status: 400,
                message,
            }) if message.contains("Unable to parse range") => {
                return Err(StoreError::WorksheetNotFound(sheet.to_string()))
            }
            other => other?,
        };
        let rows = body["values"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|row| {
                row.as_array()
                    .into_iter()
                    .flatten()
                    .map(|cell| match cell {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect();
        Ok(rows)
    }

    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
        let path = format!(
            "/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            encoded(&sheet_range(sheet))
        );
        self.request(Method::POST, &path, Some(json!({ "values": [values] })))?;
        tracing::info!(sheet, "appended row");
        Ok(())
    }

    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
        if row == 0 {
            return Err(StoreError::OutOfRange {
                sheet: sheet.to_string(),
                row,
                col: 0,
            });
        }
        let sheet_id = self.sheet_id(sheet)?;
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row,
                    }
                }
            }]
        });
        self.request(Method::POST, ":batchUpdate", Some(body))?;
        tracing::info!(sheet, row, "deleted row");
        Ok(())
    }

    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        if row == 0 || col == 0 {
            return Err(StoreError::OutOfRange {
                sheet: sheet.to_string(),
                row,
                col,
            });
        }
        let cell = format!("{}!{}{}", sheet_range(sheet), column_letters(col), row);
        let path = format!("/values/{}?valueInputOption=RAW", encoded(&cell));
        self.request(Method::PUT, &path, Some(json!({ "values": [[value]] })))?;
        tracing::info!(sheet, row, col, "updated cell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn values() -> Matcher {
        Matcher::Regex(r"^/v4/spreadsheets/book-1/values/".into())
    }

    fn store(server: &mockito::Server) -> SheetsStore {
        SheetsStore::new("book-1", SheetsAuth::Bearer("tok".into()))
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn quotes_sheet_names() {
        assert_eq!(sheet_range("Activiteiten Cédric"), "'Activiteiten Cédric'");
        assert_eq!(sheet_range("Lise's"), "'Lise''s'");
    }

    #[test]
    fn reads_rows_with_bearer_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", values())
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"range":"Eten!A1:A3","values":[["Gerecht"],["Pasta"],["Soep", 3]]}"#)
            .create();

        let mut store = store(&server);
        let rows = store.rows("Eten").unwrap();
        mock.assert();
        assert_eq!(
            rows,
            vec![vec!["Gerecht"], vec!["Pasta"], vec!["Soep", "3"]]
        );
    }

    #[test]
    fn empty_sheet_has_no_rows() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", values())
            .with_status(200)
            .with_body(r#"{"range":"Eten!A1:Z1000","majorDimension":"ROWS"}"#)
            .create();

        assert!(store(&server).rows("Eten").unwrap().is_empty());
    }

    #[test]
    fn lists_worksheets_and_deletes_by_sheet_id() {
        let mut server = mockito::Server::new();
        let _meta = server
            .mock(
                "GET",
                Matcher::Regex(r"^/v4/spreadsheets/book-1(\?.*)?$".into()),
            )
            .with_status(200)
            .with_body(
                r#"{"sheets":[{"properties":{"sheetId":0,"title":"Eten"}},{"properties":{"sheetId":42,"title":"Taken"}}]}"#,
            )
            .create();
        let delete = server
            .mock("POST", "/v4/spreadsheets/book-1:batchUpdate")
            .match_body(Matcher::Json(json!({
                "requests": [{"deleteDimension": {"range": {
                    "sheetId": 42, "dimension": "ROWS", "startIndex": 3, "endIndex": 4
                }}}]
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        let mut store = store(&server);
        assert_eq!(store.worksheets().unwrap(), vec!["Eten", "Taken"]);
        store.delete_row("Taken", 4).unwrap();
        delete.assert();
    }

    #[test]
    fn append_posts_values() {
        let mut server = mockito::Server::new();
        let append = server
            .mock(
                "POST",
                Matcher::Regex(r"^/v4/spreadsheets/book-1/values/.*:append".into()),
            )
            .match_body(Matcher::Json(
                json!({"values": [["Ramen", "Jaarlijks", "Hoog", ""]]}),
            ))
            .with_status(200)
            .with_body("{}")
            .create();

        let row: Vec<String> = ["Ramen", "Jaarlijks", "Hoog", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        store(&server).append_row("Taken", &row).unwrap();
        append.assert();
    }

    #[test]
    fn http_errors_surface_as_remote_errors() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", values())
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#)
            .create();

        match store(&server).rows("Eten") {
            Err(StoreError::Remote { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("permission"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn update_cell_puts_a1_range() {
        let mut server = mockito::Server::new();
        let put = server
            .mock(
                "PUT",
                Matcher::Regex(
                    r"^/v4/spreadsheets/book-1/values/%27Taken%27%21D2(\?valueInputOption=RAW)?$"
                        .into(),
                ),
            )
            .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({"values": [["2024-06-05"]]})))
            .with_status(200)
            .with_body(r#"{"updatedRange":"Taken!D2","updatedCells":1}"#)
            .create();

        store(&server)
            .update_cell("Taken", 2, 4, "2024-06-05")
            .unwrap();
        put.assert();
    }

    #[test]
    fn service_account_token_is_exchanged_once() {
        let mut server = mockito::Server::new();
        let token = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "grant_type".into(),
                    "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
                ),
                Matcher::Regex(r"assertion=[\w-]+\.[\w-]+\.[\w-]+".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"access_token":"ya29.household","expires_in":3600,"token_type":"Bearer"}"#,
            )
            .expect(1)
            .create();
        let values = server
            .mock("GET", values())
            .match_header("authorization", "Bearer ya29.household")
            .with_status(200)
            .with_body(r#"{"values":[["Gerecht"],["Pasta"]]}"#)
            .expect(2)
            .create();

        let key = ServiceAccountKey {
            client_email: "planner@household.iam.gserviceaccount.com".into(),
            private_key: include_str!("testdata/service_account_key.pem").into(),
            token_uri: format!("{}/token", server.url()),
        };
        let mut store = SheetsStore::new("book-1", SheetsAuth::ServiceAccount(key))
            .unwrap()
            .with_base_url(server.url());

        assert_eq!(store.rows("Eten").unwrap().len(), 2);
        assert_eq!(store.rows("Eten").unwrap().len(), 2);
        token.assert();
        values.assert();
    }

    #[test]
    fn token_endpoint_errors_are_auth_errors() {
        let mut server = mockito::Server::new();
        let _token = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#)
            .create();

        let key = ServiceAccountKey {
            client_email: "planner@household.iam.gserviceaccount.com".into(),
            private_key: include_str!("testdata/service_account_key.pem").into(),
            token_uri: format!("{}/token", server.url()),
        };
        let mut store = SheetsStore::new("book-1", SheetsAuth::ServiceAccount(key))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(store.rows("Eten"), Err(StoreError::Auth(_))));
    }

    #[test]
    fn update_rejects_zero_coordinates() {
        let server = mockito::Server::new();
        assert!(matches!(
            store(&server).update_cell("Taken", 0, 4, "x"),
            Err(StoreError::OutOfRange { .. })
        ));
    }
}
