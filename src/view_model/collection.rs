use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::{
    client::ResourceGateway,
    traits::Resource,
    types::{book::Book, genre::Genre, id::Id},
    view_model::{remove_by_id, upsert_by_id, DeleteRequest, Notice, NoticeBoard},
};

pub type BookCatalog<G> = CollectionViewModel<Book, G>;
pub type GenreAdmin<G> = CollectionViewModel<Genre, G>;

/// The cached, ordered list of one resource plus its edit state.
pub struct CollectionViewModel<R, G> {
    gateway:      G,
    items:        Vec<R>,
    is_loading:   bool,
    editing_item: Option<R>,
    notices:      NoticeBoard,
}

impl<R, G> CollectionViewModel<R, G>
where
    R: Resource,
    G: ResourceGateway<R>,
{
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            is_loading: false,
            editing_item: None,
            notices: NoticeBoard::default(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices.set_ttl(ttl);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn find(&self, id: Id) -> Option<&R> {
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn editing_item(&self) -> Option<&R> {
        self.editing_item.as_ref()
    }

    /// The draft being edited, for the presentation layer to fill in.
    pub fn editing_mut(&mut self) -> Option<&mut R> {
        self.editing_item.as_mut()
    }

    pub fn notice(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    /// Replaces the cached list with the server's, keeping server order.
    pub async fn refresh(&mut self) -> bool {
        self.is_loading = true;
        let result = self.gateway.list(None).await;
        self.is_loading = false;
        match result {
            Ok(items) => {
                info!("Loaded {} {}", items.len(), R::NAME_PLURAL);
                self.items = items;
                true
            }
            Err(e) => {
                self.notices.fail("load", R::NAME_PLURAL, &e);
                false
            }
        }
    }

    pub async fn create(&mut self, payload: R::Payload) -> bool {
        match self.gateway.create(&payload).await {
            Ok(record) => {
                info!("Created {} {}", R::NAME_SINGULAR, record.id());
                upsert_by_id(&mut self.items, record);
                self.notices
                    .raise(Notice::success(format!("Created {}", R::NAME_SINGULAR)));
                true
            }
            Err(e) => {
                self.notices.fail("create", R::NAME_SINGULAR, &e);
                false
            }
        }
    }

    pub fn begin_edit(&mut self, item: R) {
        self.editing_item = Some(item);
    }

    pub fn cancel_edit(&mut self) {
        self.editing_item = None;
    }

    /// Sends the draft. On failure the draft stays put so the user can retry.
    pub async fn submit_edit(&mut self) -> bool {
        let Some(editing) = &self.editing_item else {
            return false;
        };
        let id = editing.id();
        let payload = editing.to_payload();
        match self.gateway.update(id, &payload).await {
            Ok(record) => {
                info!("Updated {} {id}", R::NAME_SINGULAR);
                upsert_by_id(&mut self.items, record);
                self.editing_item = None;
                self.notices
                    .raise(Notice::success(format!("Updated {}", R::NAME_SINGULAR)));
                true
            }
            Err(e) => {
                self.notices.fail("update", R::NAME_SINGULAR, &e);
                false
            }
        }
    }

    pub fn request_delete(&self, id: Id) -> DeleteRequest<R> {
        DeleteRequest::new(id)
    }

    pub async fn confirm_delete(&mut self, request: DeleteRequest<R>) -> bool {
        let id = request.id();
        match self.gateway.delete(id).await {
            Ok(()) => {
                info!("Deleted {} {id}", R::NAME_SINGULAR);
                remove_by_id(&mut self.items, id);
                if self.editing_item.as_ref().map(|x| x.id()) == Some(id) {
                    self.editing_item = None;
                }
                self.notices
                    .raise(Notice::success(format!("Deleted {}", R::NAME_SINGULAR)));
                true
            }
            Err(e) => {
                self.notices.fail("delete", R::NAME_SINGULAR, &e);
                false
            }
        }
    }
}
