use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::{
    client::ResourceGateway,
    traits::Named,
    types::{
        book::Book,
        copy::{BookCopy, CopyPayload, CopyStatus},
        id::Id,
    },
    view_model::{remove_by_id, upsert_by_id, DeleteRequest, Notice, NoticeBoard},
};

/// Fields of the copy form.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CopyDraft {
    pub status:   CopyStatus,
    pub location: String,
}

impl CopyDraft {
    fn to_payload(&self, book_id: Id) -> CopyPayload {
        CopyPayload {
            book_id:  Some(book_id),
            status:   self.status,
            location: self.location.clone(),
        }
    }
}

impl From<&BookCopy> for CopyDraft {
    fn from(copy: &BookCopy) -> Self {
        Self {
            status:   copy.status,
            location: copy.location.clone(),
        }
    }
}

/// `Closed -> Creating | Editing`, and back to `Closed` on cancel or save.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum CopyForm {
    #[default]
    Closed,
    Creating(CopyDraft),
    Editing {
        copy_id: Id,
        draft:   CopyDraft,
    },
}

impl CopyForm {
    pub fn is_open(&self) -> bool {
        !matches!(self, CopyForm::Closed)
    }

    pub fn draft(&self) -> Option<&CopyDraft> {
        match self {
            CopyForm::Closed => None,
            CopyForm::Creating(draft) | CopyForm::Editing { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut CopyDraft> {
        match self {
            CopyForm::Closed => None,
            CopyForm::Creating(draft) | CopyForm::Editing { draft, .. } => Some(draft),
        }
    }
}

/// One book and the copies the library holds of it.
pub struct BookDetailViewModel<G> {
    gateway:    G,
    book_id:    Option<Id>,
    book:       Option<Book>,
    copies:     Vec<BookCopy>,
    is_loading: bool,
    copy_form:  CopyForm,
    notices:    NoticeBoard,
}

impl<G> BookDetailViewModel<G>
where
    G: ResourceGateway<Book> + ResourceGateway<BookCopy>,
{
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            book_id: None,
            book: None,
            copies: Vec::new(),
            is_loading: false,
            copy_form: CopyForm::Closed,
            notices: NoticeBoard::default(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices.set_ttl(ttl);
        self
    }

    pub fn book_id(&self) -> Option<Id> {
        self.book_id
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn copies(&self) -> &[BookCopy] {
        &self.copies
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn copy_form(&self) -> &CopyForm {
        &self.copy_form
    }

    pub fn copy_draft_mut(&mut self) -> Option<&mut CopyDraft> {
        self.copy_form.draft_mut()
    }

    pub fn notice(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    /// Fetches the book and its copies side by side. Either fetch may fail
    /// on its own; the other still lands. When both fail the copies notice
    /// is the one left standing.
    pub async fn activate(&mut self, book_id: Id) {
        if self.book_id != Some(book_id) {
            self.book = None;
            self.copies.clear();
            self.copy_form = CopyForm::Closed;
        }
        self.book_id = Some(book_id);
        self.is_loading = true;

        let (book, copies) = tokio::join!(
            ResourceGateway::<Book>::get(&self.gateway, book_id),
            ResourceGateway::<BookCopy>::list(&self.gateway, Some(book_id)),
        );

        match book {
            Ok(book) => self.book = Some(book),
            Err(e) => self.notices.fail("load", Book::NAME_SINGULAR, &e),
        }
        match copies {
            Ok(copies) => {
                info!("Loaded {} copies of book {book_id}", copies.len());
                self.copies = copies;
            }
            Err(e) => self.notices.fail("load", BookCopy::NAME_PLURAL, &e),
        }
        self.is_loading = false;
    }

    pub fn open_create_form(&mut self) -> bool {
        if self.copy_form.is_open() {
            return false;
        }
        self.copy_form = CopyForm::Creating(CopyDraft::default());
        true
    }

    pub fn open_edit_form(&mut self, copy_id: Id) -> bool {
        if self.copy_form.is_open() {
            return false;
        }
        let Some(copy) = self.copies.iter().find(|x| x.id == copy_id) else {
            return false;
        };
        self.copy_form = CopyForm::Editing {
            copy_id,
            draft: copy.into(),
        };
        true
    }

    pub fn cancel_copy_form(&mut self) {
        self.copy_form = CopyForm::Closed;
    }

    /// Creates or updates the copy in the open form, scoped to the active book.
    pub async fn save_copy(&mut self) -> bool {
        let Some(book_id) = self.book_id else {
            return false;
        };
        let ((action, done), result) = match &self.copy_form {
            CopyForm::Closed => return false,
            CopyForm::Creating(draft) => {
                let payload = draft.to_payload(book_id);
                let result = ResourceGateway::<BookCopy>::create(&self.gateway, &payload).await;
                (("create", "Created"), result)
            }
            CopyForm::Editing { copy_id, draft } => {
                let payload = draft.to_payload(book_id);
                let result =
                    ResourceGateway::<BookCopy>::update(&self.gateway, *copy_id, &payload).await;
                (("update", "Updated"), result)
            }
        };
        match result {
            Ok(copy) => {
                info!("Saved copy {} of book {book_id}", copy.id);
                upsert_by_id(&mut self.copies, copy);
                self.copy_form = CopyForm::Closed;
                self.notices
                    .raise(Notice::success(format!("{done} {}", BookCopy::NAME_SINGULAR)));
                true
            }
            Err(e) => {
                self.notices.fail(action, BookCopy::NAME_SINGULAR, &e);
                false
            }
        }
    }

    pub fn request_copy_delete(&self, copy_id: Id) -> DeleteRequest<BookCopy> {
        DeleteRequest::new(copy_id)
    }

    pub async fn confirm_copy_delete(&mut self, request: DeleteRequest<BookCopy>) -> bool {
        let id = request.id();
        match ResourceGateway::<BookCopy>::delete(&self.gateway, id).await {
            Ok(()) => {
                info!("Deleted copy {id}");
                remove_by_id(&mut self.copies, id);
                if matches!(self.copy_form, CopyForm::Editing { copy_id, .. } if copy_id == id) {
                    self.copy_form = CopyForm::Closed;
                }
                self.notices
                    .raise(Notice::success(format!("Deleted {}", BookCopy::NAME_SINGULAR)));
                true
            }
            Err(e) => {
                self.notices.fail("delete", BookCopy::NAME_SINGULAR, &e);
                false
            }
        }
    }
}
