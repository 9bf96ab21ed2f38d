//! Decoding of XML list responses
//!
//! Handles the three document shapes the listing API returns:
//! `ListAllMyBucketsResult`, `ListBucketResult` and `Error`. Parsing is a
//! single streaming pass with byte-slice tag matching. The root element
//! decides whether the body is an error document, so an error is never
//! partially read as a success.

use jiff::Timestamp;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use sx_core::{BucketRecord, DecodeError, ErrorRecord, ObjectPage, ObjectRecord};

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// `ListAllMyBucketsResult`, or any body carrying `Bucket` elements
    Buckets(Vec<BucketRecord>),
    /// `ListBucketResult`, or any body carrying `Contents` elements
    Objects(ObjectPage),
    /// `Error` document
    Error(ErrorRecord),
    /// Empty body or a document with nothing recognizable in it
    Empty,
}

impl Document {
    /// Short name of the document kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Buckets(_) => "bucket list",
            Document::Objects(_) => "object list",
            Document::Error(_) => "error",
            Document::Empty => "empty document",
        }
    }
}

/// Decode a response body
///
/// `region` fills [`BucketRecord::region`]; the bucket list does not carry it.
pub fn decode(body: &[u8], region: &str) -> Result<Document, DecodeError> {
    let result = decode_inner(body, region);
    match &result {
        Ok(document) => {
            tracing::debug!(len = body.len(), kind = document.kind(), "decoded response body")
        }
        Err(e) => tracing::debug!(len = body.len(), error = %e, "failed to decode response body"),
    }
    result
}

fn decode_inner(body: &[u8], region: &str) -> Result<Document, DecodeError> {
    let malformed = |reason: String| DecodeError::MalformedBody {
        len: body.len(),
        reason,
    };

    let mut reader = Reader::from_reader(body);
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut collector: Option<Collector> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e).map_err(malformed)?;
                open_element(&mut collector, &stack, &name).map_err(malformed)?;
                stack.push(name);
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e).map_err(malformed)?;
                open_element(&mut collector, &stack, &name).map_err(malformed)?;
                if let Some(collector) = collector.as_mut() {
                    collector.close(&stack, &name, String::new(), region);
                }
                text.clear();
            }
            Ok(Event::Text(e)) => {
                let value = e
                    .unescape()
                    .map_err(|_| malformed(at_byte("invalid escape sequence", &reader)))?;
                if stack.is_empty() {
                    if !value.trim().is_empty() {
                        return Err(malformed("text outside of the root element".into()));
                    }
                } else {
                    text.push_str(&value);
                }
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => {
                let name = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without opening tag".into()))?;
                if let Some(collector) = collector.as_mut() {
                    collector.close(&stack, &name, std::mem::take(&mut text), region);
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(at_byte(syntax_error_kind(&e), &reader))),
        }
    }

    if !stack.is_empty() {
        return Err(malformed(format!(
            "document ends with {} unclosed element(s)",
            stack.len()
        )));
    }

    Ok(collector.map_or(Document::Empty, Collector::finish))
}

/// Describe a parse failure without quoting the document; quick-xml's own
/// messages repeat tag names and entity text from the body.
fn syntax_error_kind(e: &quick_xml::Error) -> &'static str {
    match e {
        quick_xml::Error::EndEventMismatch { .. } => "mismatched closing tag",
        quick_xml::Error::UnexpectedEof(_) => "unexpected end of document",
        quick_xml::Error::EscapeError(_) => "invalid escape sequence",
        quick_xml::Error::NonDecodable(_) => "document is not valid UTF-8",
        _ => "invalid XML",
    }
}

fn at_byte(kind: &str, reader: &Reader<&[u8]>) -> String {
    format!("{kind} at byte {}", reader.buffer_position())
}

fn element_name(e: &BytesStart<'_>) -> Result<String, String> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| format!("element name is not UTF-8: {e}"))
}

/// Create the collector on the root element and notify it of every opening tag
fn open_element(
    collector: &mut Option<Collector>,
    stack: &[String],
    name: &str,
) -> Result<(), String> {
    match collector {
        Some(_) if stack.is_empty() => Err("second root element".to_string()),
        Some(collector) => {
            collector.open(name);
            Ok(())
        }
        None => {
            *collector = Some(Collector::new(name));
            Ok(())
        }
    }
}

/// What the root element says the document is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Error,
    BucketList,
    ObjectList,
    Other,
}

#[derive(Default)]
struct PendingBucket {
    name: String,
    creation_date: Option<String>,
}

struct Collector {
    root: Root,
    error: ErrorRecord,
    buckets: Vec<BucketRecord>,
    objects: Vec<ObjectRecord>,
    pending_bucket: Option<PendingBucket>,
    pending_object: Option<ObjectRecord>,
    prefix: Option<String>,
    truncated: bool,
}

impl Collector {
    fn new(root_name: &str) -> Self {
        let root = match root_name {
            "Error" => Root::Error,
            "ListAllMyBucketsResult" => Root::BucketList,
            "ListBucketResult" => Root::ObjectList,
            _ => Root::Other,
        };
        Self {
            root,
            error: ErrorRecord {
                code: String::new(),
                message: String::new(),
            },
            buckets: Vec::new(),
            objects: Vec::new(),
            pending_bucket: None,
            pending_object: None,
            prefix: None,
            truncated: false,
        }
    }

    fn open(&mut self, name: &str) {
        if self.root == Root::Error {
            return;
        }
        match name {
            "Bucket" => self.pending_bucket = Some(PendingBucket::default()),
            "Contents" => self.pending_object = Some(ObjectRecord::new(String::new(), 0)),
            _ => {}
        }
    }

    /// `stack` holds the ancestors of the element being closed
    fn close(&mut self, stack: &[String], name: &str, text: String, region: &str) {
        let parent = stack.last().map(String::as_str);

        if self.root == Root::Error {
            match (parent, name) {
                (Some("Error"), "Code") => self.error.code = text,
                (Some("Error"), "Message") => self.error.message = text,
                _ => {}
            }
            return;
        }

        match (parent, name) {
            (Some("Bucket"), "Name") => {
                if let Some(bucket) = self.pending_bucket.as_mut() {
                    bucket.name = text;
                }
            }
            (Some("Bucket"), "CreationDate") => {
                if let Some(bucket) = self.pending_bucket.as_mut() {
                    bucket.creation_date = Some(text);
                }
            }
            (_, "Bucket") => {
                if let Some(bucket) = self.pending_bucket.take() {
                    self.buckets.push(BucketRecord {
                        name: bucket.name,
                        region: region.to_string(),
                        created_at: creation_time(bucket.creation_date.as_deref()),
                    });
                }
            }
            (Some("Contents"), "Key") => {
                if let Some(object) = self.pending_object.as_mut() {
                    object.key = text;
                }
            }
            (Some("Contents"), "Size") => {
                if let Some(object) = self.pending_object.as_mut() {
                    object.size = text.trim().parse().unwrap_or(0);
                }
            }
            (Some("Contents"), "LastModified") => {
                if let Some(object) = self.pending_object.as_mut() {
                    object.last_modified = text;
                }
            }
            (Some("Contents"), "ETag") => {
                if let Some(object) = self.pending_object.as_mut() {
                    object.etag = text.replace('"', "");
                }
            }
            (_, "Contents") => {
                if let Some(object) = self.pending_object.take() {
                    self.objects.push(object);
                }
            }
            (Some(_), "Prefix") if stack.len() == 1 => self.prefix = Some(text),
            (Some(_), "IsTruncated") if stack.len() == 1 => {
                self.truncated = text.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    fn finish(self) -> Document {
        let page = |c: Collector| ObjectPage {
            prefix: c.prefix,
            objects: c.objects,
            truncated: c.truncated,
        };

        match self.root {
            Root::Error => Document::Error(self.error),
            Root::BucketList => Document::Buckets(self.buckets),
            Root::ObjectList => Document::Objects(page(self)),
            Root::Other if !self.buckets.is_empty() => Document::Buckets(self.buckets),
            Root::Other if !self.objects.is_empty() => Document::Objects(page(self)),
            Root::Other => Document::Empty,
        }
    }
}

/// Parse a bucket creation date, falling back to the current time
fn creation_time(raw: Option<&str>) -> Timestamp {
    raw.and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(Timestamp::now)
}
