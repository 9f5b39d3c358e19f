//! Form field rules for the sign-in and sign-up forms
//!
//! Only the decision lives here. Marking inputs and showing messages is left
//! to the page, which calls [`validate_field`] on blur, on input while a
//! field is marked, and for every required input before submitting.

use thiserror::Error;

/// Minimum accepted password length, in UTF-16 code units as the browser
/// counts `input.value.length`
pub const MIN_PASSWORD_LEN: usize = 6;

/// Whitespace as JS `trim()` and regex `\s` see it: Unicode White_Space
/// plus the byte order mark
fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Why a field was rejected; `Display` is the message shown under the input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Este campo es requerido")]
    Required,

    #[error("Por favor ingresa un email válido")]
    InvalidEmail,

    #[error("La contraseña debe tener al menos 6 caracteres")]
    PasswordTooShort,
}

/// The input kinds with dedicated rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
}

impl FieldKind {
    /// Map an HTML input `type` attribute; unknown types get the text rules
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.to_ascii_lowercase().as_str() {
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            _ => FieldKind::Text,
        }
    }
}

/// Check a required field's raw value
///
/// Surrounding whitespace is ignored. Emptiness is checked first, then the
/// kind-specific rule.
pub fn validate_field(kind: FieldKind, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim_matches(is_js_whitespace);
    if value.is_empty() {
        return Err(FieldError::Required);
    }

    match kind {
        FieldKind::Email if !is_valid_email(value) => Err(FieldError::InvalidEmail),
        FieldKind::Password if value.encode_utf16().count() < MIN_PASSWORD_LEN => {
            Err(FieldError::PasswordTooShort)
        }
        _ => Ok(()),
    }
}

/// Validate every field without stopping at the first failure
///
/// Returns the failing fields by index; empty means the form can be sent.
pub fn validate_all<'a, I>(fields: I) -> Vec<(usize, FieldError)>
where
    I: IntoIterator<Item = (FieldKind, &'a str)>,
{
    fields
        .into_iter()
        .enumerate()
        .filter_map(|(i, (kind, raw))| validate_field(kind, raw).err().map(|e| (i, e)))
        .collect()
}

/// `local@domain.tld` shape check
///
/// No whitespace, exactly one `@` with text before it, and a `.` in the
/// domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_js_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
