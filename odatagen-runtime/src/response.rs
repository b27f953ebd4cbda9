use serde::{Deserialize, Serialize};

/// The envelope of a collection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    /// The `@odata.context` URL returned by the service
    #[serde(rename = "@odata.context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Total number of matches, present when the query asked for it
    #[serde(rename = "@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Link to the next page of a paged result
    #[serde(rename = "@odata.nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
    /// The entities of this page
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> QueryResult<T> {
    /// Whether the service has more pages.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

/// The envelope of a primitive or collection operation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleValue<T> {
    #[serde(rename = "@odata.context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub value: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_reads_annotations() {
        let body = r#"{
            "@odata.context": "https://example.com/odata/$metadata#Orders",
            "@odata.count": 42,
            "@odata.nextLink": "https://example.com/odata/Orders?$skip=2",
            "value": [1, 2]
        }"#;
        let result: QueryResult<i32> = serde_json::from_str(body).unwrap();

        assert_eq!(result.count, Some(42));
        assert!(result.has_more());
        assert_eq!(result.value, [1, 2]);
    }

    #[test]
    fn test_single_value_unwraps_value() {
        let body = r#"{"@odata.context": "x", "value": 12.5}"#;
        let result: SingleValue<f64> = serde_json::from_str(body).unwrap();
        assert_eq!(result.value, 12.5);
    }
}
