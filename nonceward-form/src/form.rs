//! Nonce form field handling.

use crate::input::FormInput;
use nonceward_core::{NonceResult, NonceStorage, NoncesManager, Token};
use nonceward_log::debug;
use once_cell::sync::OnceCell;

/// Separator between the nonce name and value in the field value.
pub const FIELD_SEPARATOR: char = ':';

/// The name and value parsed from a submitted field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Submitted {
    name: Option<String>,
    value: Option<String>,
}

impl Submitted {
    /// Split on the first separator. Only the name side is split, so values
    /// may contain the separator.
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::default(),
            Some(raw) => {
                let (name, value) = raw.split_once(FIELD_SEPARATOR).unwrap_or((raw, ""));
                Self {
                    name: Some(name.to_string()),
                    value: Some(value.to_string()),
                }
            }
        }
    }
}

/// Handles the nonce of a single form field for one request.
///
/// It renders a fresh nonce as `name:value` for the next submission and
/// checks the nonce that came with the current one. The submitted nonce is
/// consumed on the first check; the result is remembered so later checks
/// on the same instance agree.
///
/// # Examples
///
/// ```
/// use nonceward_core::{MemoryStorage, NoncesManager, SharedNonceMap};
/// use nonceward_form::{FormInput, NonceForm};
///
/// # tokio_test::block_on(async {
/// let session = SharedNonceMap::default();
///
/// // Rendering request
/// let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
/// let mut form = NonceForm::new("token", manager, FormInput::new());
/// let rendered = form.field_value().await?;
///
/// // Submission request
/// let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
/// let input = FormInput::from_pairs([("token", rendered)]);
/// let mut form = NonceForm::new("token", manager, input);
/// assert!(form.is_submitted_valid().await?);
/// # Ok::<(), nonceward_core::NonceError>(())
/// # }).unwrap();
/// ```
pub struct NonceForm<S: NonceStorage> {
    field_name: String,
    manager: NoncesManager<S>,
    input: FormInput,
    submitted: OnceCell<Submitted>,
    is_valid: Option<bool>,
    nonce: Option<Token>,
}

impl<S: NonceStorage> NonceForm<S> {
    pub fn new(field_name: impl Into<String>, manager: NoncesManager<S>, input: FormInput) -> Self {
        Self {
            field_name: field_name.into(),
            manager,
            input,
            submitted: OnceCell::new(),
            is_valid: None,
            nonce: None,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn manager(&self) -> &NoncesManager<S> {
        &self.manager
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// Whether the field is present in the input, even if empty.
    pub fn was_submitted(&self) -> bool {
        self.input.contains(&self.field_name)
    }

    /// Nonce name from the submitted field, if one was submitted.
    pub fn submitted_name(&self) -> Option<&str> {
        self.submitted().name.as_deref()
    }

    /// Nonce value from the submitted field, if one was submitted.
    ///
    /// Empty when the field has a name but no separator.
    pub fn submitted_value(&self) -> Option<&str> {
        self.submitted().value.as_deref()
    }

    fn submitted(&self) -> &Submitted {
        self.submitted
            .get_or_init(|| Submitted::parse(self.input.get(&self.field_name)))
    }

    /// The nonce to render for the next submission.
    ///
    /// Created with a generated name on the first call; later calls return
    /// the same nonce. It has nothing to do with the submitted one.
    pub async fn new_nonce(&mut self) -> NonceResult<&Token> {
        let token = match self.nonce.take() {
            Some(token) => token,
            None => {
                let token = self.manager.create(None, None).await?;
                debug_assert!(!token.name().contains(FIELD_SEPARATOR));
                debug!(
                    "Issued nonce '{}' for field '{}'",
                    token.name(),
                    self.field_name
                );
                token
            }
        };

        Ok(&*self.nonce.insert(token))
    }

    /// Field value to render: `name:value` of [`new_nonce`](Self::new_nonce).
    pub async fn field_value(&mut self) -> NonceResult<String> {
        let token = self.new_nonce().await?;
        Ok(format!("{}{}{}", token.name(), FIELD_SEPARATOR, token.value()))
    }

    /// Whether a valid nonce was submitted.
    ///
    /// False when nothing was submitted. Otherwise the submitted nonce is
    /// verified and expired in one step on the first call, and every later
    /// call returns the same answer without touching storage. Storage errors
    /// are returned and not remembered.
    pub async fn is_submitted_valid(&mut self) -> NonceResult<bool> {
        if let Some(valid) = self.is_valid {
            return Ok(valid);
        }

        let valid = match self.submitted() {
            Submitted {
                name: Some(name),
                value: Some(value),
            } => self.manager.verify_and_expire(name, value).await?,
            _ => false,
        };

        if !valid && self.was_submitted() {
            debug!("Rejected submitted nonce for field '{}'", self.field_name);
        }
        self.is_valid = Some(valid);
        Ok(valid)
    }

    /// Whether a nonce was submitted and it is not valid.
    pub async fn is_submitted_invalid(&mut self) -> NonceResult<bool> {
        Ok(self.was_submitted() && !self.is_submitted_valid().await?)
    }
}
