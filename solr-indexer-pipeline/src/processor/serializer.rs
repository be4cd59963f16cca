//! XML payload serializer.

use std::borrow::Cow;

use quick_xml::escape::escape;

use solr_indexer_shared::{DocumentRecord, Payload};

/// How field names and values are written into the XML payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    /// Write names and values verbatim.
    ///
    /// Values containing `<`, `>`, `&` or quotes produce malformed XML that
    /// Solr will reject.
    #[default]
    Raw,
    /// Escape `<`, `>`, `&`, `'` and `"` as XML entities.
    Strict,
}

/// Renders one document record as a single-document `<add>` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer {
    escape: EscapeMode,
}

impl XmlSerializer {
    pub fn new(escape: EscapeMode) -> Self {
        Self { escape }
    }

    /// Serialize `record` as
    /// `<add><doc><field name='K'>V</field>...</doc></add>`, with fields in
    /// insertion order.
    pub fn serialize(&self, record: &DocumentRecord) -> Payload {
        let body_len: usize = record.iter().map(|(k, v)| k.len() + v.len() + 29).sum();
        let mut body = String::with_capacity(body_len + 22);

        body.push_str("<add><doc>");
        for (name, value) in record.iter() {
            body.push_str("<field name='");
            body.push_str(&self.text(name));
            body.push_str("'>");
            body.push_str(&self.text(value));
            body.push_str("</field>");
        }
        body.push_str("</doc></add>");

        Payload::new(body)
    }

    fn text<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self.escape {
            EscapeMode::Raw => Cow::Borrowed(raw),
            EscapeMode::Strict => escape(raw),
        }
    }
}
