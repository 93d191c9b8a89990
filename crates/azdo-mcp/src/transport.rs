//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! One message per line. stdout carries protocol traffic only; logs go to
//! stderr.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// A line read from the client, classified.
#[derive(Debug)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    /// A line that is not a JSON-RPC message. Carries the parse error.
    Malformed(String),
}

pub struct StdioTransport {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
}

impl StdioTransport {
    /// Create a transport using stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Create a transport with a custom reader/writer.
    pub fn new(reader: Box<dyn BufRead + Send>, writer: Box<dyn Write + Send>) -> Self {
        Self { reader, writer }
    }

    /// Read the next JSON-RPC message.
    ///
    /// Blank lines are skipped. `Ok(None)` means EOF; `Err` is reserved for
    /// I/O failures of the underlying reader.
    pub fn read_message(&mut self) -> io::Result<Option<IncomingMessage>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Received: {}", line);
            return Ok(Some(parse_message(line)));
        }
    }

    /// Write a JSON-RPC response to the transport.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Serialization error: {}", e))
        })?;

        debug!("Sending: {}", json);

        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }
}

fn parse_message(line: &str) -> IncomingMessage {
    // Requests carry an id, notifications don't
    if let Ok(request) = serde_json::from_str::<JsonRpcRequest>(line) {
        return IncomingMessage::Request(request);
    }

    match serde_json::from_str::<JsonRpcNotification>(line) {
        Ok(notification) => IncomingMessage::Notification(notification),
        Err(e) => {
            warn!("Failed to parse message: {}", line);
            IncomingMessage::Malformed(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Writer that keeps everything written for later inspection.
    #[derive(Clone, Default)]
    pub(crate) struct SharedWriter(pub Arc<Mutex<Vec<u8>>>);

    impl SharedWriter {
        pub(crate) fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn transport(input: &str) -> StdioTransport {
        StdioTransport::new(
            Box::new(Cursor::new(input.to_string())),
            Box::new(Vec::new()),
        )
    }

    #[test]
    fn test_read_request() {
        let mut transport =
            transport("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\",\"params\":{}}\n");

        match transport.read_message().unwrap() {
            Some(IncomingMessage::Request(req)) => {
                assert_eq!(req.method, "tools/list");
                assert_eq!(req.id, RequestId::Number(1));
            }
            other => panic!("Expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_read_notification() {
        let mut transport = transport("{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}\n");

        match transport.read_message().unwrap() {
            Some(IncomingMessage::Notification(notif)) => {
                assert_eq!(notif.method, "initialized");
            }
            other => panic!("Expected notification, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut transport = transport("\n   \n{\"jsonrpc\":\"2.0\",\"id\":\"a\",\"method\":\"ping\"}\n");

        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Request(_))
        ));
        assert!(transport.read_message().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line() {
        let mut transport = transport("not json\n{\"jsonrpc\":\"2.0\",\"method\":\"x\"}\n");

        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Malformed(_))
        ));
        // The stream keeps going after a bad line
        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Notification(_))
        ));
    }

    #[test]
    fn test_write_response() {
        let writer = SharedWriter::default();
        let mut transport =
            StdioTransport::new(Box::new(Cursor::new(Vec::new())), Box::new(writer.clone()));

        let response =
            JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({"ok": true}));
        transport.write_response(&response).unwrap();

        let lines = writer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"jsonrpc\":\"2.0\""));
        assert!(lines[0].contains("\"id\":1"));
    }

    #[test]
    fn test_read_eof() {
        let mut transport = transport("");
        assert!(transport.read_message().unwrap().is_none());
    }
}
