pub type AthResult<T> = Result<T, AthError>;

#[derive(Debug, thiserror::Error)]
pub enum AthError {
    #[error("[CSV Error] {0}")]
    CsvError(#[from] ::csv::Error),

    #[error("[HTTP Request Error] {0}")]
    HttpRequestError(#[from] ::reqwest::Error),

    #[error("[HTTP Middleware Error] {0}")]
    HttpMiddlewareError(#[from] ::reqwest_middleware::Error),

    #[error("[HTTP Status Error] [{request}] {status}")]
    HttpStatusError { status: String, request: String },

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[No Data] {message}")]
    NoData { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse URL Error] {0}")]
    ParseUrlError(#[from] url::ParseError),

    #[error("{message}")]
    Schema { column: String, message: String },

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),
}

impl AthError {
    pub fn missing_column(column: &str) -> Self {
        Self::Schema {
            column: column.to_string(),
            message: format!("Column '{column}' not found in the CSV file."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = AthError::missing_column("stock");

        assert_eq!(err.to_string(), "Column 'stock' not found in the CSV file.");
    }
}
