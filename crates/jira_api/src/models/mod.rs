mod filter;
mod issue;
mod search;
mod user;
mod worklog;

pub use filter::FilterDetails;
pub use issue::IssueRecord;
pub use search::SearchPage;
pub use user::UserProfile;
pub use worklog::{WorklogAuthor, WorklogEntry, WorklogPage};
