mod document;
mod ids;
mod journal;
mod material;
mod question;
mod user;

pub use document::{Document, DocumentError};
pub use ids::{EntryId, MaterialId, ParseIdError, QuestionId};
pub use journal::{Activity, EntryError, ProgressEntry};
pub use material::{Material, MaterialError};
pub use question::{Question, QuestionError};
pub use user::{Role, User, UserError, Username};
