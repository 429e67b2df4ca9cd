/// Commands initiated by the UI (View -> Controller)
/// These are "requests" to perform actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Dial the given code as initiator
    Connect(String),
    SendMessage(String),
    /// Leave the chat, or cancel a pending connection
    Disconnect,
}
