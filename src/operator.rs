//! Operator input channel.
//!
//! Translates a stream of line tokens into control-signal transitions,
//! running as its own task for the lifetime of a scan. The channel never
//! touches the axes, the progress sink, or the record store.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::control::ControlSignal;

/// Token that pauses the scan.
const PAUSE: &str = "p";
/// Token that resumes a paused scan.
const RESUME: &str = "r";
/// Token that stops the scan and ends the listener.
const QUIT: &str = "q";

/// Listener translating operator tokens into [`ControlSignal`] transitions.
pub struct OperatorChannel {
    signal: ControlSignal,
}

impl OperatorChannel {
    /// Wrap the writer half of the control signal.
    pub fn new(signal: ControlSignal) -> Self {
        Self { signal }
    }

    /// Read tokens until `q`, end of input, or a read error.
    ///
    /// Reads block this task only, never the controller. Tokens are
    /// trimmed and lowercased; anything unrecognized is ignored.
    pub async fn run<R>(self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !self.dispatch(line.trim()) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    log::warn!("operator input error: {err}");
                    break;
                }
            }
        }
    }

    /// Apply one token. Returns `false` once the listener should stop
    /// accepting commands.
    fn dispatch(&self, token: &str) -> bool {
        match token.to_ascii_lowercase().as_str() {
            PAUSE => {
                self.signal.pause();
                log::info!("scan paused");
                true
            }
            RESUME => {
                self.signal.resume();
                log::info!("scan resumed");
                true
            }
            QUIT => {
                self.signal.stop();
                log::info!("stop requested");
                false
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlState;

    #[test]
    fn tokens_drive_signal_transitions() {
        let signal = ControlSignal::new();
        let watch = signal.watch();
        let channel = OperatorChannel::new(signal);

        assert!(channel.dispatch("p"));
        assert_eq!(watch.current(), ControlState::Paused);
        assert!(channel.dispatch("R")); // case-insensitive
        assert_eq!(watch.current(), ControlState::Running);
        assert!(!channel.dispatch("q"));
        assert_eq!(watch.current(), ControlState::Stopped);
    }

    #[test]
    fn unrecognized_tokens_are_ignored() {
        let signal = ControlSignal::new();
        let watch = signal.watch();
        let channel = OperatorChannel::new(signal);

        assert!(channel.dispatch("x"));
        assert!(channel.dispatch(""));
        assert!(channel.dispatch("pause"));
        assert_eq!(watch.current(), ControlState::Running);
    }

    #[tokio::test]
    async fn run_consumes_lines_until_quit() {
        let signal = ControlSignal::new();
        let watch = signal.watch();
        let channel = OperatorChannel::new(signal);

        let input = tokio::io::BufReader::new(&b"p\nbogus\nq\nr\n"[..]);
        channel.run(input).await;

        // `q` ends the listener before the trailing `r` is read.
        assert_eq!(watch.current(), ControlState::Stopped);
    }

    #[tokio::test]
    async fn run_stops_at_end_of_input() {
        let signal = ControlSignal::new();
        let watch = signal.watch();
        let channel = OperatorChannel::new(signal);

        let input = tokio::io::BufReader::new(&b"p\n"[..]);
        channel.run(input).await;

        assert_eq!(watch.current(), ControlState::Paused);
    }
}
