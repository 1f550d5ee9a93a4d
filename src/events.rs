// Event types for async communication

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The model returned screenplay text
    GenerationComplete(String),
    /// The generation request failed; carries the error description for the log
    GenerationFailed(String),
}
