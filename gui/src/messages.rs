use tipjar_core::{ContractState, Settled, SharedResult};

#[derive(Clone)]
pub(crate) enum Message {
    // Session
    Connect,
    Disconnect,
    CopyAddress,

    // Compose form
    MessageChanged(String),
    AmountChanged(String),
    Submit,
    SubmissionSettled(Settled),
    OpenTx(String),

    // Board
    Refresh,
    /// Refresh result tagged with the connection it was started under.
    StateLoaded(u64, SharedResult<ContractState>),

    DismissNotice,
}
