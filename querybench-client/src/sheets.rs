//! Hosted Spreadsheet Client
//!
//! Speaks the Sheets v4 REST surface on behalf of the spreadsheet sink:
//! spreadsheet creation, worksheet management through `batchUpdate`, raw
//! value updates.

use querybench_report::{SpreadsheetApi, SpreadsheetError, SpreadsheetHandle};
use serde::Deserialize;
use serde_json::json;

/// Default REST endpoint of the spreadsheet service
pub const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Blocking client for the hosted spreadsheet service
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    token: String,
}

impl SheetsClient {
    /// Build a client against `endpoint` with a pre-acquired bearer token.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, SpreadsheetError> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| SpreadsheetError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, SpreadsheetError> {
        let url = format!("{}/{}:batchUpdate", self.endpoint, spreadsheet_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": [request] }))
            .send()
            .map_err(|e| SpreadsheetError::Transport(e.to_string()))?;
        parse_json(response)
    }
}

impl SpreadsheetApi for SheetsClient {
    fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SpreadsheetError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .map_err(|e| SpreadsheetError::Transport(e.to_string()))?;
        let resource: SpreadsheetResource = parse_json(response)?;

        let default_sheet_id = resource
            .sheets
            .first()
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| {
                SpreadsheetError::Response("created spreadsheet has no worksheets".to_string())
            })?;

        Ok(SpreadsheetHandle {
            spreadsheet_id: resource.spreadsheet_id,
            url: resource.spreadsheet_url,
            default_sheet_id,
        })
    }

    fn add_worksheet(&self, spreadsheet_id: &str, title: &str) -> Result<i64, SpreadsheetError> {
        let reply = self.batch_update(spreadsheet_id, add_sheet_request(title))?;
        reply
            .pointer("/replies/0/addSheet/properties/sheetId")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| {
                SpreadsheetError::Response("addSheet reply missing sheetId".to_string())
            })
    }

    fn update_values(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        values: &[Vec<String>],
    ) -> Result<(), SpreadsheetError> {
        let range = format!("'{}'!A1", worksheet_title);
        let url = format!("{}/{}/values/{}", self.endpoint, spreadsheet_id, range);
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": values,
            }))
            .send()
            .map_err(|e| SpreadsheetError::Transport(e.to_string()))?;
        check_status(response)
    }

    fn freeze_rows(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        rows: u32,
    ) -> Result<(), SpreadsheetError> {
        self.batch_update(spreadsheet_id, freeze_rows_request(sheet_id, rows))?;
        Ok(())
    }

    fn delete_worksheet(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
    ) -> Result<(), SpreadsheetError> {
        self.batch_update(spreadsheet_id, delete_sheet_request(sheet_id))?;
        Ok(())
    }
}

fn add_sheet_request(title: &str) -> serde_json::Value {
    json!({ "addSheet": { "properties": { "title": title } } })
}

fn freeze_rows_request(sheet_id: i64, rows: u32) -> serde_json::Value {
    json!({
        "updateSheetProperties": {
            "properties": {
                "sheetId": sheet_id,
                "gridProperties": { "frozenRowCount": rows },
            },
            "fields": "gridProperties.frozenRowCount",
        }
    })
}

fn delete_sheet_request(sheet_id: i64) -> serde_json::Value {
    json!({ "deleteSheet": { "sheetId": sheet_id } })
}

fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, SpreadsheetError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from(status.as_u16(), response));
    }
    response
        .json()
        .map_err(|e| SpreadsheetError::Response(e.to_string()))
}

fn check_status(response: reqwest::blocking::Response) -> Result<(), SpreadsheetError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from(status.as_u16(), response));
    }
    Ok(())
}

fn error_from(status: u16, response: reqwest::blocking::Response) -> SpreadsheetError {
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    SpreadsheetError::Api { status, message }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetResource {
    spreadsheet_id: String,
    #[serde(default)]
    spreadsheet_url: String,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sheet_request_shape() {
        let value = add_sheet_request("Query Executions");
        assert_eq!(
            value["addSheet"]["properties"]["title"],
            "Query Executions"
        );
    }

    #[test]
    fn test_freeze_rows_request_shape() {
        let value = freeze_rows_request(77, 1);
        let update = &value["updateSheetProperties"];
        assert_eq!(update["properties"]["sheetId"], 77);
        assert_eq!(update["properties"]["gridProperties"]["frozenRowCount"], 1);
        assert_eq!(update["fields"], "gridProperties.frozenRowCount");
    }

    #[test]
    fn test_delete_sheet_request_shape() {
        let value = delete_sheet_request(0);
        assert_eq!(value["deleteSheet"]["sheetId"], 0);
    }

    #[test]
    fn test_spreadsheet_resource_parsed() {
        let resource: SpreadsheetResource = serde_json::from_str(
            r#"{
                "spreadsheetId": "abc123",
                "spreadsheetUrl": "https://docs.example/abc123",
                "sheets": [{"properties": {"sheetId": 0, "title": "Sheet1"}}]
            }"#,
        )
        .unwrap();
        assert_eq!(resource.spreadsheet_id, "abc123");
        assert_eq!(resource.sheets[0].properties.sheet_id, 0);
    }

    #[test]
    fn test_error_envelope_parsed() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"error": {"code": 429, "message": "Rate limit", "status": "RESOURCE_EXHAUSTED"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "Rate limit");
    }
}
