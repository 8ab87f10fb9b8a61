//! TwiML Response Builders
//!
//! The provider drives live calls by POSTing to our webhook endpoints and
//! executing the XML control document we answer with. Only four shapes are
//! ever produced: dial a number, speak a message, hang up, and the
//! voicemail greeting/record flow. Everything interpolated into a document
//! goes through [`escape_xml`], since numbers and greetings come from
//! request data.
//!
//! Builders return plain strings; the webhook routes attach the
//! `text/xml` content type.

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// How long a voicemail recording may run, in seconds.
const VOICEMAIL_MAX_LENGTH_SECS: u32 = 120;

// ============================================================================
// DOCUMENT BUILDERS
// ============================================================================

/// Dial an outbound number, bridging it to the caller.
///
/// `caller_id` is presented to the dialed party when configured; without it
/// the provider falls back to the originating number. The call is recorded
/// from answer and the provider reports the finished recording to
/// `recording_callback`.
pub fn dial_number(caller_id: Option<&str>, number: &str, recording_callback: &str) -> String {
    let caller_id_attr = caller_id
        .map(|id| format!(" callerId=\"{}\"", escape_xml(id)))
        .unwrap_or_default();

    format!(
        "{}<Response><Dial{} record=\"record-from-answer-dual\" \
         recordingStatusCallback=\"{}\"><Number>{}</Number></Dial></Response>",
        XML_HEADER,
        caller_id_attr,
        escape_xml(recording_callback),
        escape_xml(number),
    )
}

/// Speak a message to the caller. The call ends when the document does.
pub fn say(message: &str) -> String {
    format!(
        "{}<Response><Say>{}</Say></Response>",
        XML_HEADER,
        escape_xml(message)
    )
}

/// End the call immediately.
pub fn hangup() -> String {
    format!("{}<Response><Hangup/></Response>", XML_HEADER)
}

/// Greet an inbound caller and record a voicemail.
///
/// The provider POSTs the finished recording to `action_url` and, once the
/// transcription job settles, its status and text to `transcribe_callback`.
pub fn voicemail_greeting(greeting: &str, action_url: &str, transcribe_callback: &str) -> String {
    format!(
        "{}<Response><Say>{}</Say>\
         <Record maxLength=\"{}\" playBeep=\"true\" action=\"{}\" \
         transcribe=\"true\" transcribeCallback=\"{}\"/></Response>",
        XML_HEADER,
        escape_xml(greeting),
        VOICEMAIL_MAX_LENGTH_SECS,
        escape_xml(action_url),
        escape_xml(transcribe_callback),
    )
}

// ============================================================================
// ESCAPING
// ============================================================================

/// Escape the five XML metacharacters so interpolated values cannot break
/// out of their element or attribute.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// TESTS
// ============================================================================
