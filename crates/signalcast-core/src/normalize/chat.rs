use crate::backend::GenerateResponse;
use crate::error::AcquisitionError;
use crate::ChatTurn;

/// Trimmed primary text of a reply; blank text is an empty response.
pub fn reply_text(response: &GenerateResponse) -> Result<String, AcquisitionError> {
    response
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or(AcquisitionError::EmptyResponse)
}

/// Wraps the reply as a model-authored chat turn.
pub fn normalize_chat_reply(response: &GenerateResponse) -> Result<ChatTurn, AcquisitionError> {
    reply_text(response).map(ChatTurn::model)
}
