//! Account editor.
//!
//! Headless counterpart of the account form: it loads the signed-in user's
//! profile, tracks edits, persists them with an upsert, delegates avatar
//! uploads and signs out. Rendering is left to the embedding UI, which reads
//! [`ProfileEditor::form`], [`ProfileEditor::is_loading`] and
//! [`ProfileEditor::submit_label`].

mod editor;
mod notifier;

pub use editor::{ProfileEditor, ProfileForm, SUBMIT_LABEL, SUBMIT_LABEL_LOADING};
pub use notifier::{LogNotifier, Notifier};
