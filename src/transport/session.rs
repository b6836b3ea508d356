//! Host session — newline-delimited JSON messages over a reader/writer pair.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use super::message::{Inbound, Outbound};
use crate::compiler::FaustBackend;
use crate::error::BridgeError;
use crate::transform::SourceTransformer;

/// Serves transform requests one at a time until the input closes.
pub struct Session<B, R, W> {
    transformer: SourceTransformer<B>,
    reader: R,
    writer: W,
}

impl<B: FaustBackend, R: BufRead, W: Write> Session<B, R, W> {
    pub fn new(transformer: SourceTransformer<B>, reader: R, writer: W) -> Self {
        Self {
            transformer,
            reader,
            writer,
        }
    }

    /// Announce readiness, then handle messages until EOF.
    ///
    /// Returns the number of transform requests answered.
    pub fn run(&mut self) -> Result<usize, BridgeError> {
        self.send(&Outbound::Ready)?;
        info!("source transformer ready");

        let mut handled = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = match std::str::from_utf8(&buf) {
                Ok(text) => text.trim(),
                Err(e) => {
                    warn!("skipping line that is not UTF-8: {e}");
                    continue;
                }
            };
            if text.is_empty() {
                continue;
            }
            match serde_json::from_str::<Inbound>(text) {
                Ok(Inbound::TransformRequest { message }) => {
                    debug!(filename = %message.filename, "transform request");
                    let contents = self
                        .transformer
                        .transform(&message.filename, &message.contents);
                    self.send(&Outbound::transform_response(contents))?;
                    handled += 1;
                }
                Ok(Inbound::Unknown) => debug!("ignoring message: {text}"),
                Err(e) => warn!("unreadable message: {e}"),
            }
        }
        info!(handled, "host closed the session");
        Ok(handled)
    }

    fn send(&mut self, message: &Outbound) -> Result<(), BridgeError> {
        serde_json::to_writer(&mut self.writer, message)
            .map_err(|e| BridgeError::Io(e.into()))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the session, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::testing::{ScriptedBackend, Step};
    use crate::compiler::CmajorCompiler;
    use serde_json::Value;
    use std::io::Cursor;

    fn run_session(steps: Vec<Step>, input: &str) -> (usize, Vec<Value>) {
        let compiler = CmajorCompiler::new(ScriptedBackend::new(steps));
        let transformer = SourceTransformer::new(compiler);
        let mut session = Session::new(transformer, Cursor::new(input.to_string()), Vec::new());
        let handled = session.run().unwrap();
        let out = String::from_utf8(session.into_writer()).unwrap();
        let messages = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (handled, messages)
    }

    #[test]
    fn ready_is_sent_first_even_without_input() {
        let (handled, messages) = run_session(Vec::new(), "");
        assert_eq!(handled, 0);
        assert_eq!(messages, vec![serde_json::json!({ "type": "ready" })]);
    }

    #[test]
    fn answers_each_request_in_order() {
        let input = concat!(
            r#"{"type":"transformRequest","message":{"filename":"a.cmajor","contents":"A"}}"#,
            "\n",
            r#"{"type":"transformRequest","message":{"filename":"osc.dsp","contents":"process = _;"}}"#,
            "\n",
        );
        let steps = vec![ScriptedBackend::succeeding(
            "graph osc {}",
            r#"{"name":"osc","ui":[]}"#,
        )];
        let (handled, messages) = run_session(steps, input);
        assert_eq!(handled, 2);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["type"], "transformResponse");
        assert_eq!(messages[1]["message"]["contents"], "A");
        assert_eq!(messages[2]["message"]["contents"], "graph osc {}");
    }

    #[test]
    fn skips_blank_garbage_and_unknown_lines() {
        let input = concat!(
            "\n",
            "not json\n",
            r#"{"type":"ping"}"#,
            "\n",
            r#"{"type":"transformRequest","message":{"filename":"x.txt","contents":"x"}}"#,
        );
        let (handled, messages) = run_session(Vec::new(), input);
        assert_eq!(handled, 1);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["message"]["contents"], "x");
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(
            br#"{"type":"transformRequest","message":{"filename":"a.txt","contents":"kept"}}"#,
        );
        input.push(b'\n');

        let compiler = CmajorCompiler::new(ScriptedBackend::default());
        let transformer = SourceTransformer::new(compiler);
        let mut session = Session::new(transformer, Cursor::new(input), Vec::new());
        assert_eq!(session.run().unwrap(), 1);

        let out = String::from_utf8(session.into_writer()).unwrap();
        let messages: Vec<Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["message"]["contents"], "kept");
    }

    #[test]
    fn failed_compile_replies_with_original() {
        let input = concat!(
            r#"{"type":"transformRequest","message":{"filename":"bad.dsp","contents":"process = ;"}}"#,
            "\n",
        );
        let steps = vec![Step::Refuse("syntax error".to_string())];
        let (_, messages) = run_session(steps, input);
        assert_eq!(messages[1]["message"]["contents"], "process = ;");
    }
}
