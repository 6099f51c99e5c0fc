mod common;

use std::pin::pin;

use pretty_assertions::assert_eq;

use shelfadmin::{
    types::{copy::CopyStatus, id::Id},
    view_model::detail::{BookDetailViewModel, CopyDraft, CopyForm},
};

use common::{blocks, book, copy, FakeGateway, GatedGateway};

async fn active(gateway: &FakeGateway, book_id: i64) -> BookDetailViewModel<FakeGateway> {
    let mut detail = BookDetailViewModel::new(gateway.clone());
    detail.activate(Id(book_id)).await;
    detail
}

#[tokio::test]
async fn activate_loads_book_and_its_copies() {
    let gateway = FakeGateway::new(
        vec![book(5, "Ficciones"), book(6, "Other")],
        vec![copy(9, 5, "A-1"), copy(10, 6, "B-2"), copy(11, 5, "A-2")],
        vec![],
    );
    let detail = active(&gateway, 5).await;

    assert_eq!(detail.book(), Some(&book(5, "Ficciones")));
    assert_eq!(detail.copies(), &[copy(9, 5, "A-1"), copy(11, 5, "A-2")]);
    assert!(!detail.is_loading());
    assert_eq!(detail.book_id(), Some(Id(5)));
}

#[tokio::test]
async fn loading_clears_only_after_both_fetches() {
    let gateway = GatedGateway::new(FakeGateway::new(
        vec![book(5, "Ficciones")],
        vec![copy(9, 5, "A-1")],
        vec![],
    ));
    let mut detail = BookDetailViewModel::new(gateway.clone());

    {
        let mut call = pin!(detail.activate(Id(5)));
        assert!(blocks(call.as_mut()).await);
        gateway.release_get();
        assert!(blocks(call.as_mut()).await);
    }
    // The book fetch finished but the copies fetch never did.
    assert!(detail.is_loading());
    assert_eq!(gateway.inner.calls(), vec!["get book"]);

    gateway.release_get();
    gateway.release_list();
    detail.activate(Id(5)).await;
    assert!(!detail.is_loading());
    assert_eq!(detail.book(), Some(&book(5, "Ficciones")));
    assert_eq!(detail.copies(), &[copy(9, 5, "A-1")]);
}

#[tokio::test]
async fn failed_book_fetch_still_shows_copies() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![copy(9, 5, "A-1")], vec![]);
    gateway.fail("get book");
    let mut detail = active(&gateway, 5).await;

    assert_eq!(detail.book(), None);
    assert_eq!(detail.copies(), &[copy(9, 5, "A-1")]);
    assert!(!detail.is_loading());
    let notice = detail.take_notice().expect("error notice");
    assert!(notice.is_error());
    assert_eq!(notice.text, "Failed to load book");
}

#[tokio::test]
async fn failed_copies_fetch_still_shows_book() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![copy(9, 5, "A-1")], vec![]);
    gateway.fail("list copy");
    let mut detail = active(&gateway, 5).await;

    assert_eq!(detail.book(), Some(&book(5, "Ficciones")));
    assert!(detail.copies().is_empty());
    assert!(!detail.is_loading());
    assert_eq!(
        detail.take_notice().map(|x| x.text),
        Some("Failed to load copies".to_string())
    );
}

#[tokio::test]
async fn successful_activation_raises_no_notice() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![], vec![]);
    let mut detail = active(&gateway, 5).await;

    assert_eq!(detail.take_notice(), None);
}

#[tokio::test]
async fn activating_another_book_drops_the_previous_one() {
    let gateway = FakeGateway::new(
        vec![book(5, "Ficciones")],
        vec![copy(9, 5, "A-1")],
        vec![],
    );
    let mut detail = active(&gateway, 5).await;
    assert!(detail.open_create_form());

    detail.activate(Id(7)).await;

    assert_eq!(detail.book(), None);
    assert!(detail.copies().is_empty());
    assert_eq!(detail.copy_form(), &CopyForm::Closed);
}

#[tokio::test]
async fn saving_a_new_copy_scopes_it_to_the_book() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![copy(9, 5, "A-1")], vec![]);
    let mut detail = active(&gateway, 5).await;

    assert!(detail.open_create_form());
    if let Some(draft) = detail.copy_draft_mut() {
        draft.location = "Shelf C".into();
    }
    assert!(detail.save_copy().await);

    assert_eq!(detail.copies(), &[copy(9, 5, "A-1"), copy(10, 5, "Shelf C")]);
    assert_eq!(gateway.copies().last(), Some(&copy(10, 5, "Shelf C")));
    assert_eq!(detail.copy_form(), &CopyForm::Closed);
    assert_eq!(
        detail.take_notice().map(|x| x.text),
        Some("Created copy".to_string())
    );
}

#[tokio::test]
async fn editing_a_copy_replaces_it_in_place() {
    let gateway = FakeGateway::new(
        vec![book(5, "Ficciones")],
        vec![copy(9, 5, "A-1"), copy(11, 5, "A-2")],
        vec![],
    );
    let mut detail = active(&gateway, 5).await;

    assert!(detail.open_edit_form(Id(9)));
    assert_eq!(
        detail.copy_form().draft(),
        Some(&CopyDraft {
            status:   CopyStatus::Available,
            location: "A-1".into(),
        })
    );
    if let Some(draft) = detail.copy_draft_mut() {
        draft.status = CopyStatus::Unavailable;
    }
    assert!(detail.save_copy().await);

    let mut lent = copy(9, 5, "A-1");
    lent.status = CopyStatus::Unavailable;
    assert_eq!(detail.copies(), &[lent, copy(11, 5, "A-2")]);
    assert!(!detail.copy_form().is_open());
    assert!(gateway.calls().contains(&"update copy".to_string()));
}

#[tokio::test]
async fn failed_save_keeps_the_form_open() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![], vec![]);
    let mut detail = active(&gateway, 5).await;

    assert!(detail.open_create_form());
    gateway.fail("create copy");
    assert!(!detail.save_copy().await);

    assert!(detail.copy_form().is_open());
    assert!(detail.copies().is_empty());
    assert_eq!(
        detail.take_notice().map(|x| x.text),
        Some("Failed to create copy".to_string())
    );
}

#[tokio::test]
async fn cancelling_the_form_makes_no_call() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![copy(9, 5, "A-1")], vec![]);
    let mut detail = active(&gateway, 5).await;
    let calls = gateway.calls().len();

    assert!(detail.open_edit_form(Id(9)));
    if let Some(draft) = detail.copy_draft_mut() {
        draft.location = "elsewhere".into();
    }
    detail.cancel_copy_form();

    assert_eq!(gateway.calls().len(), calls);
    assert_eq!(detail.copies(), &[copy(9, 5, "A-1")]);
    assert!(!detail.save_copy().await);
    assert_eq!(gateway.calls().len(), calls);
}

#[tokio::test]
async fn only_one_form_at_a_time() {
    let gateway = FakeGateway::new(vec![book(5, "Ficciones")], vec![copy(9, 5, "A-1")], vec![]);
    let mut detail = active(&gateway, 5).await;

    assert!(!detail.open_edit_form(Id(404)));
    assert!(detail.open_create_form());
    assert!(!detail.open_edit_form(Id(9)));
    assert!(!detail.open_create_form());
    assert!(matches!(detail.copy_form(), CopyForm::Creating(_)));
}

#[tokio::test]
async fn save_needs_an_active_book() {
    let gateway = FakeGateway::new(vec![], vec![], vec![]);
    let mut detail = BookDetailViewModel::new(gateway.clone());

    assert!(detail.open_create_form());
    assert!(!detail.save_copy().await);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn deleting_a_copy() {
    let gateway = FakeGateway::new(
        vec![book(5, "Ficciones")],
        vec![copy(9, 5, "A-1"), copy(11, 5, "A-2")],
        vec![],
    );
    let mut detail = active(&gateway, 5).await;

    gateway.fail("delete copy");
    let request = detail.request_copy_delete(Id(9));
    assert!(!detail.confirm_copy_delete(request).await);
    assert_eq!(detail.copies().len(), 2);

    gateway.recover("delete copy");
    assert!(detail.open_edit_form(Id(9)));
    let request = detail.request_copy_delete(Id(9));
    assert!(detail.confirm_copy_delete(request).await);

    assert_eq!(detail.copies(), &[copy(11, 5, "A-2")]);
    assert_eq!(detail.copy_form(), &CopyForm::Closed);
    assert_eq!(gateway.copies(), vec![copy(11, 5, "A-2")]);
}
