//! 도메인 서비스.
//!
//! 라우트 핸들러는 인증된 [`notes_core::Claims`]의 사용자 ID만 서비스에 넘깁니다.

mod notes;
mod profile;

pub use notes::{NoteInput, NotesError, NotesService};
pub use profile::{Profile, ProfileError, ProfileService, UpdateProfileInput};
