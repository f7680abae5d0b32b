use crate::domain_model::UserRecord;
use std::borrow::Cow;

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const WEBSERVICE_NS: &str = "http://www.example.org/webservice";

pub const CONTENT_TYPE: &str = "text/xml";

/// Renders lookup results as a `getUserByUsernameResponse` envelope.
///
/// Field values go in as text nodes. With `escape_values` off they are
/// substituted verbatim, which lets markup in a username break the document.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeRenderer {
    escape_values: bool,
}

impl EnvelopeRenderer {
    pub fn new(escape_values: bool) -> Self {
        EnvelopeRenderer { escape_values }
    }

    pub fn render_user(&self, user: &UserRecord) -> String {
        let id = self.field(&user.id.0);
        let username = self.field(&user.username);

        format!(
            r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENVELOPE_NS}" xmlns:web="{WEBSERVICE_NS}">
  <soapenv:Header/>
  <soapenv:Body>
    <web:getUserByUsernameResponse>
      <web:id>{id}</web:id>
      <web:username>{username}</web:username>
    </web:getUserByUsernameResponse>
  </soapenv:Body>
</soapenv:Envelope>
"#
        )
    }

    fn field<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.escape_values {
            escape_text(value)
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl Default for EnvelopeRenderer {
    fn default() -> Self {
        EnvelopeRenderer::new(true)
    }
}

fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
