// WhatsApp / email message generators built on the spintax engine.
// Templates come from the built-in catalogue or from stored drafts.

pub mod assist;
pub mod compose;
pub mod drafts;
pub mod handlers;
pub mod prompts;
pub mod templates;
