//! Operator-facing alert wording.

use shared::domain::Alert;

pub const ATTENTION_TITLE: &str = "Attention";
pub const MISSING_CODE_MESSAGE: &str = "Please scan or enter a barcode.";

pub const NO_CONNECTION_TITLE: &str = "No Connection";
pub const NO_CONNECTION_MESSAGE: &str = "An internet connection is required to validate codes.";

pub const PROCESSING_ERROR_TITLE: &str = "Error";
pub const PROCESSING_ERROR_MESSAGE: &str = "An error occurred while validating the code.";

pub const CONNECTION_ERROR_TITLE: &str = "Connection Error";
pub const CONNECTION_ERROR_MESSAGE: &str = "Could not connect to the redemption server.";

pub const REDEEMED_TITLE: &str = "Redemption Successful";
pub const DEFAULT_REDEEMED_MESSAGE: &str = "Turkey redeemed successfully.";

pub const REJECTED_TITLE: &str = "Redemption Failed";
pub const DEFAULT_REJECTED_MESSAGE: &str = "Unknown error while processing the redemption.";

pub fn missing_code() -> Alert {
    Alert::warning(ATTENTION_TITLE, MISSING_CODE_MESSAGE)
}

pub fn no_connection() -> Alert {
    Alert::danger(NO_CONNECTION_TITLE, NO_CONNECTION_MESSAGE)
}

pub fn processing_error() -> Alert {
    Alert::danger(PROCESSING_ERROR_TITLE, PROCESSING_ERROR_MESSAGE)
}

pub fn connection_error() -> Alert {
    Alert::danger(CONNECTION_ERROR_TITLE, CONNECTION_ERROR_MESSAGE)
}

pub fn redeemed(server_message: Option<&str>) -> Alert {
    Alert::success(
        REDEEMED_TITLE,
        server_message.unwrap_or(DEFAULT_REDEEMED_MESSAGE),
    )
}

pub fn rejected(server_message: Option<&str>) -> Alert {
    Alert::danger(
        REJECTED_TITLE,
        server_message.unwrap_or(DEFAULT_REJECTED_MESSAGE),
    )
}
