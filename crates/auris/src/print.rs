//! Datagram rendering.
//!
//! One datagram becomes one block of lines on stdout: a summary line with
//! where the datagram came from and went, then one line per question and
//! record. Blocks from concurrent listeners are serialized through a
//! mutex so they never interleave.

use std::fmt::Write as _;

use parking_lot::Mutex;
use tracing::debug;

use auris_net::{DatagramHandler, InterfaceDirectory, ReceiveMetadata};
use auris_proto::{Message, OpCode, Question, ResourceRecord, ResponseCode};

/// Decodes datagrams and prints them.
pub struct Printer {
    directory: InterfaceDirectory,
    output: Mutex<()>,
}

impl Printer {
    /// Creates a printer. The directory maps interface indexes back to
    /// names in the summary line.
    pub fn new(directory: InterfaceDirectory) -> Self {
        Self {
            directory,
            output: Mutex::new(()),
        }
    }

    fn interface_label(&self, meta: &ReceiveMetadata) -> String {
        match meta.interface_index {
            Some(index) => match self.directory.lookup_by_index(index) {
                Some(iface) => iface.name.clone(),
                None => format!("if{index}"),
            },
            None => "?".to_string(),
        }
    }

    /// Renders one decoded message as a printable block.
    fn render(&self, message: &Message<'_>, meta: &ReceiveMetadata, len: usize) -> String {
        let mut out = String::new();
        let header = &message.header;

        let _ = write!(out, "[{}] ", self.interface_label(meta));
        match meta.source {
            Some(source) => {
                let _ = write!(out, "{source}");
            }
            None => out.push('?'),
        }
        if let Some(destination) = meta.destination {
            let _ = write!(out, " -> {destination}");
        }
        let _ = write!(
            out,
            " {} {}",
            if header.is_response() {
                "response"
            } else {
                "query"
            },
            opcode_label(header.opcode),
        );
        if header.is_response() || header.rcode != 0 {
            let _ = write!(out, " {}", rcode_label(header.rcode));
        }
        if header.id != 0 {
            let _ = write!(out, " id {:#06x}", header.id);
        }
        let _ = write!(out, " ({len} bytes)");

        for question in &message.questions {
            render_question(&mut out, question);
        }
        for record in &message.answers {
            render_record(&mut out, '!', record);
        }
        for record in &message.authorities {
            render_record(&mut out, '~', record);
        }
        for record in &message.additionals {
            render_record(&mut out, '+', record);
        }
        out
    }
}

impl DatagramHandler for Printer {
    fn handle(&self, payload: &[u8], meta: &ReceiveMetadata) {
        match Message::parse(payload) {
            Ok(message) => {
                let block = self.render(&message, meta, payload.len());
                let _guard = self.output.lock();
                println!("{block}");
            }
            Err(err) => {
                debug!(source = ?meta.source, len = payload.len(), error = %err,
                       "undecodable datagram");
            }
        }
    }
}

fn render_question(out: &mut String, question: &Question) {
    let _ = write!(out, "\n  ? {question}");
    if question.unicast_response() {
        out.push_str(" (QU)");
    }
}

fn render_record(out: &mut String, marker: char, record: &ResourceRecord<'_>) {
    let _ = write!(out, "\n  {marker} {record}");
    if record.cache_flush() {
        out.push_str(" (cache-flush)");
    }
}

fn opcode_label(opcode: u8) -> String {
    match OpCode::try_from(opcode) {
        Ok(op) => op.to_string(),
        Err(_) => format!("OPCODE{opcode}"),
    }
}

fn rcode_label(rcode: u8) -> String {
    match ResponseCode::try_from(rcode) {
        Ok(rc) => rc.to_string(),
        Err(_) => format!("RCODE{rcode}"),
    }
}
