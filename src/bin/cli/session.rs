use std::{fmt::Display, fs::File, path::PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::ArgMatches;

use shelfadmin::{
    client::CatalogClient,
    config::Config,
    export::Export,
    traits::{DisplayTerminal, Resource},
    types::id::Id,
    view_model::{
        collection::{BookCatalog, CollectionViewModel, GenreAdmin},
        detail::BookDetailViewModel,
        Notice,
    },
};

use crate::{command_parser, forms};

pub enum Flow {
    Continue,
    Exit,
}

/// View models of one CLI invocation or REPL session.
pub struct Session {
    config: Config,
    client: CatalogClient,
    books:  BookCatalog<CatalogClient>,
    genres: GenreAdmin<CatalogClient>,
}

fn id_of(matches: &ArgMatches, name: &str) -> Result<Id> {
    matches
        .get_one::<i64>(name)
        .map(|x| Id(*x))
        .ok_or_else(|| anyhow!("Missing argument <{name}>"))
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let client = CatalogClient::new(config.client_config())?;
        let ttl = config.notice_ttl();
        Ok(Self {
            books: CollectionViewModel::new(client.clone()).with_notice_ttl(ttl),
            genres: CollectionViewModel::new(client.clone()).with_notice_ttl(ttl),
            client,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let Some(words) = shlex::split(line) else {
            bail!("Invalid command");
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }
        let matches = command_parser::arg_parser_repl().try_get_matches_from(words)?;
        self.dispatch(&matches).await
    }

    pub async fn dispatch(&mut self, matches: &ArgMatches) -> Result<Flow> {
        match matches.subcommand() {
            Some(("books", matches)) => self.books_command(matches).await?,
            Some(("genres", matches)) => self.genres_command(matches).await?,
            Some(("copies", matches)) => self.copies_command(matches).await?,
            Some(("export", matches)) => self.export_command(matches).await?,
            Some(("config", _)) => print!("{}", Config::default_as_string()?),
            Some(("exit", _)) => return Ok(Flow::Exit),
            Some((name, _)) => bail!("Unknown command {name}"),
            None => unreachable!("subcommand required"),
        }
        Ok(Flow::Continue)
    }

    fn print(&self, item: &impl DisplayTerminal) -> Result<()> {
        println!("{}", item.fmt_to_string(&self.config)?);
        Ok(())
    }

    fn detail(&self) -> BookDetailViewModel<CatalogClient> {
        BookDetailViewModel::new(self.client.clone())
            .with_notice_ttl(self.config.notice_ttl())
    }

    async fn books_command(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("list", _)) => {
                self.books.refresh().await;
                report(&self.config, self.books.take_notice())?;
                for book in self.books.items() {
                    self.print(book)?;
                }
            }
            Some(("show", matches)) => {
                self.show_book(id_of(matches, "id")?).await?;
            }
            Some(("add", _)) => {
                self.genres.refresh().await;
                report(&self.config, self.genres.take_notice())?;
                match forms::new_book(self.genres.items())? {
                    Some(payload) => {
                        self.books.create(payload).await;
                        report(&self.config, self.books.take_notice())?;
                    }
                    None => println!("Cancelled"),
                }
            }
            Some(("edit", matches)) => {
                let id = id_of(matches, "id")?;
                let book = loaded(&mut self.books, id).await?;
                self.genres.refresh().await;
                report(&self.config, self.genres.take_notice())?;
                self.books.begin_edit(book);
                let edited = match self.books.editing_mut() {
                    Some(draft) => forms::edit_book(draft, self.genres.items()),
                    None => Ok(false),
                };
                if matches!(edited, Ok(true)) {
                    self.books.submit_edit().await;
                    report(&self.config, self.books.take_notice())?;
                } else {
                    self.books.cancel_edit();
                    edited?;
                    println!("Cancelled");
                }
            }
            Some(("remove", matches)) => {
                let book = loaded(&mut self.books, id_of(matches, "id")?).await?;
                remove_confirmed(&mut self.books, &book, &self.config).await?;
            }
            Some((name, _)) => bail!("Unknown command books {name}"),
            None => unreachable!("subcommand required"),
        }
        Ok(())
    }

    async fn genres_command(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("list", _)) => {
                self.genres.refresh().await;
                report(&self.config, self.genres.take_notice())?;
                for genre in self.genres.items() {
                    self.print(genre)?;
                }
            }
            Some(("add", _)) => match forms::new_genre()? {
                Some(payload) => {
                    self.genres.create(payload).await;
                    report(&self.config, self.genres.take_notice())?;
                }
                None => println!("Cancelled"),
            },
            Some(("edit", matches)) => {
                let genre = loaded(&mut self.genres, id_of(matches, "id")?).await?;
                self.genres.begin_edit(genre);
                let edited = match self.genres.editing_mut() {
                    Some(draft) => forms::edit_genre(draft),
                    None => Ok(false),
                };
                if matches!(edited, Ok(true)) {
                    self.genres.submit_edit().await;
                    report(&self.config, self.genres.take_notice())?;
                } else {
                    self.genres.cancel_edit();
                    edited?;
                    println!("Cancelled");
                }
            }
            Some(("remove", matches)) => {
                let genre = loaded(&mut self.genres, id_of(matches, "id")?).await?;
                remove_confirmed(&mut self.genres, &genre, &self.config).await?;
            }
            Some((name, _)) => bail!("Unknown command genres {name}"),
            None => unreachable!("subcommand required"),
        }
        Ok(())
    }

    async fn show_book(&self, id: Id) -> Result<()> {
        let mut detail = self.detail();
        detail.activate(id).await;
        let notice = detail.take_notice();
        let failed = notice.as_ref().is_some_and(Notice::is_error);
        report(&self.config, notice)?;
        let Some(book) = detail.book() else {
            println!("No details found for book {id}.");
            return Ok(());
        };
        self.print(book)?;
        if detail.copies().is_empty() && !failed {
            println!("No copies available");
        }
        for copy in detail.copies() {
            self.print(copy)?;
        }
        Ok(())
    }

    async fn copies_command(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("list", matches)) => self.show_book(id_of(matches, "book")?).await?,
            Some(("add", matches)) => {
                let mut detail = self.active_detail(id_of(matches, "book")?).await?;
                detail.open_create_form();
                self.fill_and_save_copy(&mut detail).await?;
            }
            Some(("edit", matches)) => {
                let book_id = id_of(matches, "book")?;
                let copy_id = id_of(matches, "copy")?;
                let mut detail = self.active_detail(book_id).await?;
                if !detail.open_edit_form(copy_id) {
                    bail!("Book {book_id} has no copy {copy_id}");
                }
                self.fill_and_save_copy(&mut detail).await?;
            }
            Some(("remove", matches)) => {
                let book_id = id_of(matches, "book")?;
                let copy_id = id_of(matches, "copy")?;
                let mut detail = self.active_detail(book_id).await?;
                let Some(copy) = detail.copies().iter().find(|x| x.id == copy_id) else {
                    bail!("Book {book_id} has no copy {copy_id}");
                };
                let what = format!("copy {copy_id} ({}, {})", copy.status, copy.location);
                let request = detail.request_copy_delete(copy_id);
                if forms::confirm_delete(&what)? {
                    detail.confirm_copy_delete(request).await;
                    report(&self.config, detail.take_notice())?;
                } else {
                    println!("Cancelled");
                }
            }
            Some((name, _)) => bail!("Unknown command copies {name}"),
            None => unreachable!("subcommand required"),
        }
        Ok(())
    }

    async fn active_detail(&self, book_id: Id) -> Result<BookDetailViewModel<CatalogClient>> {
        let mut detail = self.detail();
        detail.activate(book_id).await;
        report(&self.config, detail.take_notice())?;
        if detail.book().is_none() {
            bail!("No details found for book {book_id}");
        }
        Ok(detail)
    }

    async fn fill_and_save_copy(
        &self,
        detail: &mut BookDetailViewModel<CatalogClient>,
    ) -> Result<()> {
        let filled = match detail.copy_draft_mut() {
            Some(draft) => forms::copy_draft(draft),
            None => Ok(false),
        };
        if !matches!(filled, Ok(true)) {
            detail.cancel_copy_form();
            filled?;
            println!("Cancelled");
            return Ok(());
        }
        detail.save_copy().await;
        report(&self.config, detail.take_notice())
    }

    async fn export_command(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("books", matches)) => {
                if !self.books.refresh().await {
                    report(&self.config, self.books.take_notice())?;
                    bail!("Could not load the catalog");
                }
                self.genres.refresh().await;
                let rows = Export::new(self.books.items(), self.genres.items());
                match matches.get_one::<PathBuf>("output") {
                    Some(path) => Export::export(rows, File::create(path)?)?,
                    None => Export::export(rows, std::io::stdout())?,
                }
            }
            Some((name, _)) => bail!("Unknown command export {name}"),
            None => unreachable!("subcommand required"),
        }
        Ok(())
    }
}

/// The cached record with `id`, refreshing the collection if it is not there.
async fn loaded<R>(collection: &mut CollectionViewModel<R, CatalogClient>, id: Id) -> Result<R>
where
    R: Resource,
{
    if collection.find(id).is_none() {
        collection.refresh().await;
    }
    collection
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("No {} with id {id}", R::NAME_SINGULAR))
}

/// Asks before deleting; declining drops the request without a call.
async fn remove_confirmed<R>(
    collection: &mut CollectionViewModel<R, CatalogClient>,
    record: &R,
    config: &Config,
) -> Result<()>
where
    R: Resource + Display,
{
    let request = collection.request_delete(record.id());
    if forms::confirm_delete(&format!("{} {record}", R::NAME_SINGULAR))? {
        collection.confirm_delete(request).await;
        report(config, collection.take_notice())?;
    } else {
        println!("Cancelled");
    }
    Ok(())
}

fn report(config: &Config, notice: Option<Notice>) -> Result<()> {
    if let Some(notice) = notice {
        println!("{}", notice.fmt_to_string(config)?);
    }
    Ok(())
}
