/// Commands sent from the UI thread to the session worker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// 清零累计指标并立即持久化,同时开启新会话
    ResetCumulative,
}
