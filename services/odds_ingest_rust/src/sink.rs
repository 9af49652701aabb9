use oddsmatch_core::{CanonicalMarket, MarketSink};
use std::io::Write;

/// Appends canonical rows as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MarketSink for JsonLinesSink<W> {
    type Error = serde_json::Error;

    fn append(&mut self, rows: &[CanonicalMarket]) -> Result<(), Self::Error> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n").map_err(serde_json::Error::io)?;
            self.written += 1;
        }
        self.writer.flush().map_err(serde_json::Error::io)
    }
}
