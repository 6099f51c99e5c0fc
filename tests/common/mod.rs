#![allow(dead_code)]

use std::{
    cell::{RefCell, RefMut},
    collections::HashSet,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use reqwest::StatusCode;
use shelfadmin::{
    client::ResourceGateway,
    error::RequestFailure,
    traits::{Resource, Validate},
    types::{
        book::Book,
        copy::{BookCopy, CopyStatus},
        genre::Genre,
        id::Id,
    },
};
use tokio::sync::Notify;

/// What the fake server holds.
#[derive(Default)]
pub struct FakeState {
    pub books:   Vec<Book>,
    pub copies:  Vec<BookCopy>,
    pub genres:  Vec<Genre>,
    pub calls:   Vec<String>,
    pub failing: HashSet<String>,
}

/// Records held by the fake, and how to build them from a payload.
pub trait Stored: Resource {
    fn store(state: &mut FakeState) -> &mut Vec<Self>;
    fn from_payload(id: Id, payload: &Self::Payload) -> Self;
    fn parent(&self) -> Option<Id> {
        None
    }
}

impl Stored for Book {
    fn store(state: &mut FakeState) -> &mut Vec<Self> {
        &mut state.books
    }

    fn from_payload(id: Id, payload: &Self::Payload) -> Self {
        Book {
            id,
            title: payload.title.clone(),
            author: payload.author.clone(),
            publication_year: payload.publication_year,
            genre_id: payload.genre_id,
            genre: None,
        }
    }
}

impl Stored for Genre {
    fn store(state: &mut FakeState) -> &mut Vec<Self> {
        &mut state.genres
    }

    fn from_payload(id: Id, payload: &Self::Payload) -> Self {
        Genre {
            id,
            name: payload.name.clone(),
            description: payload.description.clone(),
        }
    }
}

impl Stored for BookCopy {
    fn store(state: &mut FakeState) -> &mut Vec<Self> {
        &mut state.copies
    }

    fn from_payload(id: Id, payload: &Self::Payload) -> Self {
        BookCopy {
            id,
            book_id: payload.book_id.unwrap_or_default(),
            status: payload.status,
            location: payload.location.clone(),
        }
    }

    fn parent(&self) -> Option<Id> {
        Some(self.book_id)
    }
}

/// In-memory stand-in for the catalog API.
///
/// Calls are recorded as `"<operation> <resource>"`, e.g. `"create book"`;
/// the same string passed to [FakeGateway::fail] makes that call fail.
#[derive(Clone, Default)]
pub struct FakeGateway(Rc<RefCell<FakeState>>);

impl FakeGateway {
    pub fn new(books: Vec<Book>, copies: Vec<BookCopy>, genres: Vec<Genre>) -> Self {
        Self(Rc::new(RefCell::new(FakeState {
            books,
            copies,
            genres,
            ..FakeState::default()
        })))
    }

    pub fn fail(&self, call: &str) {
        self.0.borrow_mut().failing.insert(call.to_string());
    }

    pub fn recover(&self, call: &str) {
        self.0.borrow_mut().failing.remove(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn books(&self) -> Vec<Book> {
        self.0.borrow().books.clone()
    }

    pub fn copies(&self) -> Vec<BookCopy> {
        self.0.borrow().copies.clone()
    }

    fn enter<R: Stored>(&self, operation: &str) -> Result<RefMut<'_, FakeState>, RequestFailure> {
        let mut state = self.0.borrow_mut();
        let call = format!("{operation} {}", R::NAME_SINGULAR);
        state.calls.push(call.clone());
        if state.failing.contains(&call) {
            return Err(RequestFailure::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body:   "boom".into(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> RequestFailure {
    RequestFailure::Status {
        status: StatusCode::NOT_FOUND,
        body:   "".into(),
    }
}

impl<R: Stored> ResourceGateway<R> for FakeGateway {
    async fn list(&self, parent: Option<Id>) -> Result<Vec<R>, RequestFailure> {
        R::list_path(parent)?;
        let mut state = self.enter::<R>("list")?;
        Ok(R::store(&mut state)
            .iter()
            .filter(|x| parent.is_none() || x.parent() == parent)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Id) -> Result<R, RequestFailure> {
        let mut state = self.enter::<R>("get")?;
        R::store(&mut state)
            .iter()
            .find(|x| x.id() == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, payload: &R::Payload) -> Result<R, RequestFailure> {
        payload.validate()?;
        let mut state = self.enter::<R>("create")?;
        let items = R::store(&mut state);
        let next = items.iter().map(|x| x.id().0).max().unwrap_or(0) + 1;
        let record = R::from_payload(Id(next), payload);
        items.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Id, payload: &R::Payload) -> Result<R, RequestFailure> {
        payload.validate()?;
        let mut state = self.enter::<R>("update")?;
        let existing = R::store(&mut state)
            .iter_mut()
            .find(|x| x.id() == id)
            .ok_or_else(not_found)?;
        *existing = R::from_payload(id, payload);
        Ok(existing.clone())
    }

    async fn delete(&self, id: Id) -> Result<(), RequestFailure> {
        let mut state = self.enter::<R>("delete")?;
        let items = R::store(&mut state);
        let before = items.len();
        items.retain(|x| x.id() != id);
        if items.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

/// Wraps a [FakeGateway] so that `get` and `list` wait until released.
///
/// A release issued before the call arrives is kept for it.
#[derive(Clone, Default)]
pub struct GatedGateway {
    pub inner: FakeGateway,
    gets:      Rc<Notify>,
    lists:     Rc<Notify>,
}

impl GatedGateway {
    pub fn new(inner: FakeGateway) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn release_get(&self) {
        self.gets.notify_one();
    }

    pub fn release_list(&self) {
        self.lists.notify_one();
    }
}

impl<R: Stored> ResourceGateway<R> for GatedGateway {
    async fn list(&self, parent: Option<Id>) -> Result<Vec<R>, RequestFailure> {
        self.lists.notified().await;
        ResourceGateway::<R>::list(&self.inner, parent).await
    }

    async fn get(&self, id: Id) -> Result<R, RequestFailure> {
        self.gets.notified().await;
        ResourceGateway::<R>::get(&self.inner, id).await
    }

    async fn create(&self, payload: &R::Payload) -> Result<R, RequestFailure> {
        ResourceGateway::<R>::create(&self.inner, payload).await
    }

    async fn update(&self, id: Id, payload: &R::Payload) -> Result<R, RequestFailure> {
        ResourceGateway::<R>::update(&self.inner, id, payload).await
    }

    async fn delete(&self, id: Id) -> Result<(), RequestFailure> {
        ResourceGateway::<R>::delete(&self.inner, id).await
    }
}

/// Polls `call` until it has to wait. Returns `false` if it finished instead.
pub async fn blocks<F: Future>(call: Pin<&mut F>) -> bool {
    tokio::select! {
        biased;
        _ = call => false,
        _ = tokio::task::yield_now() => true,
    }
}

pub fn book(id: i64, title: &str) -> Book {
    Book {
        id:               Id(id),
        title:            title.into(),
        author:           "Someone".into(),
        publication_year: 2000,
        genre_id:         Some(Id(1)),
        genre:            None,
    }
}

pub fn genre(id: i64, name: &str) -> Genre {
    Genre {
        id:          Id(id),
        name:        name.into(),
        description: "".into(),
    }
}

pub fn copy(id: i64, book_id: i64, location: &str) -> BookCopy {
    BookCopy {
        id:       Id(id),
        book_id:  Id(book_id),
        status:   CopyStatus::Available,
        location: location.into(),
    }
}
