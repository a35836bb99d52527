use std::sync::Arc;

use psalo_config::Config;
use psalo_core::language::display_name_or_code;
use psalo_core::{LanguageFilter, LanguageSide, language_options, normalize_query, to_palochka};
use psalo_types::{ApiRequest, AppEvent, SearchMode, SearchPage, SearchRequest, WordWithEntries};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;

use crate::commands::prepare_query;
use crate::controller::UiChannels;
use crate::progress::ProgressReporter;
use crate::sequence::SearchSequencer;

const HELP: &str = "\
Type a word to search.
  :starts       prefix search (default)
  :contains     substring search
  :more         next page of results
  :word <w>     show entries for a word
  :from [code]  only entries from a language, no code for all
  :to [code]    only entries into a language, no code for all
  :status       store status
  :path         store location
  :fetch        download the store
  :open         open the store folder
  :quit         exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Mode(SearchMode),
    More,
    Word(String),
    From(Option<String>),
    To(Option<String>),
    Status,
    Path,
    Fetch,
    Open,
    Help,
    Quit,
    Unknown(String),
    Blank,
}

pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "starts" => Input::Mode(SearchMode::StartsWith),
        "contains" => Input::Mode(SearchMode::Contains),
        "more" => Input::More,
        "word" if !arg.is_empty() => Input::Word(arg.to_string()),
        "from" => Input::From(language_arg(arg)),
        "to" => Input::To(language_arg(arg)),
        "status" => Input::Status,
        "path" => Input::Path,
        "fetch" => Input::Fetch,
        "open" => Input::Open,
        "help" | "h" => Input::Help,
        "quit" | "q" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// `all` or nothing clears the selection
fn language_arg(arg: &str) -> Option<String> {
    match arg {
        "" | "all" => None,
        code => Some(code.to_string()),
    }
}

/// Current search as the console sees it
struct Session {
    mode: SearchMode,
    query: Option<String>,
    page: u32,
    total_pages: u32,
    sequencer: SearchSequencer,
    progress: ProgressReporter,
    filter: LanguageFilter,
    /// Last word shown, redrawn when the filter changes
    word: Option<WordWithEntries>,
}

impl Session {
    fn new() -> Self {
        Self {
            mode: SearchMode::default(),
            query: None,
            page: 1,
            total_pages: 0,
            sequencer: SearchSequencer::new(),
            progress: ProgressReporter::default(),
            filter: LanguageFilter::default(),
            word: None,
        }
    }

    /// Forget the current query so `:more` has nothing to page through
    fn clear_results(&mut self) {
        self.query = None;
        self.page = 1;
        self.total_pages = 0;
    }

    fn redraw_word(&self) {
        match &self.word {
            Some(word) => print_word(word, &self.filter),
            None => println!("Filter set, look up a word with :word"),
        }
    }

    fn search_request(&self, page: u32, limit: u32) -> Option<ApiRequest> {
        let query = self.query.clone()?;
        Some(ApiRequest::Search(SearchRequest {
            seq: self.sequencer.next(),
            query,
            mode: self.mode,
            page,
            limit,
        }))
    }
}

/// Interactive console. Returns on `:quit` or end of input.
pub async fn ui_loop(channels: UiChannels, config: Arc<RwLock<Config>>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();

    send(&channels, ApiRequest::StoreStatus).await?;
    println!("Type :help for commands");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };

                let config = config.read().await;
                if !handle_input(parse_line(&line), &mut session, &channels, &config).await? {
                    break;
                }
            }
            event = channels.app_to_ui_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("Backend hung up");
                    break;
                };
                handle_event(event, &mut session);
            }
        }
    }

    Ok(())
}

async fn send(channels: &UiChannels, request: ApiRequest) -> anyhow::Result<()> {
    channels
        .ui_to_app_tx
        .send(AppEvent::ApiRequest(request))
        .await?;
    Ok(())
}

/// Returns false when the console should exit
async fn handle_input(
    input: Input,
    session: &mut Session,
    channels: &UiChannels,
    config: &Config,
) -> anyhow::Result<bool> {
    let limit = config.search.page_size;

    match input {
        Input::Blank => {}
        Input::Quit => return Ok(false),
        Input::Help => println!("{HELP}"),
        Input::Unknown(line) => println!("Unknown command {line}, try :help"),
        Input::Search(text) => match prepare_query(&text, session.mode, config) {
            Ok(query) => {
                session.query = Some(query);
                if let Some(request) = session.search_request(1, limit) {
                    send(channels, request).await?;
                }
            }
            Err(e) => println!("{e}"),
        },
        Input::Mode(mode) => {
            session.mode = mode;
            println!("Mode: {}", mode_label(mode));

            // The stored query may be too short for the new mode
            if let Some(query) = session.query.clone() {
                match prepare_query(&query, mode, config) {
                    Ok(_) => {
                        if let Some(request) = session.search_request(1, limit) {
                            send(channels, request).await?;
                        }
                    }
                    Err(e) => {
                        println!("{e}");
                        session.clear_results();
                    }
                }
            }
        }
        Input::More => {
            if session.query.is_none() || session.page >= session.total_pages {
                println!("No more results");
            } else if let Some(request) = session.search_request(session.page + 1, limit) {
                send(channels, request).await?;
            }
        }
        Input::Word(word) => {
            send(channels, ApiRequest::GetWord(normalize_query(&word))).await?;
        }
        Input::From(lang) => {
            session.filter.from = lang;
            session.redraw_word();
        }
        Input::To(lang) => {
            session.filter.to = lang;
            session.redraw_word();
        }
        Input::Status => send(channels, ApiRequest::StoreStatus).await?,
        Input::Path => send(channels, ApiRequest::StorePath).await?,
        Input::Fetch => {
            session.progress = ProgressReporter::default();
            send(channels, ApiRequest::FetchStore).await?;
        }
        Input::Open => send(channels, ApiRequest::OpenStoreLocation).await?,
    }

    Ok(true)
}

fn handle_event(event: AppEvent, session: &mut Session) {
    match event {
        AppEvent::SearchResults { seq, page } => {
            if !session.sequencer.is_current(seq) {
                tracing::debug!("Dropping stale results #{}", seq);
                return;
            }
            session.page = page.page;
            session.total_pages = page.total_pages;
            print_page(&page);
        }
        AppEvent::Word { word, result } => match result {
            Some(word) => {
                print_word(&word, &session.filter);
                session.word = Some(word);
            }
            None => println!("No entries for {}", to_palochka(&word)),
        },
        AppEvent::StoreStatus(status) => {
            if status.needs_setup {
                println!("The dictionary is not downloaded yet, run :fetch");
            } else {
                println!("Dictionary ready");
            }
        }
        AppEvent::StorePath(path) => println!("{path}"),
        AppEvent::LocationOpened(dir) => println!("Opened {dir}"),
        AppEvent::FetchProgress(fraction) => {
            if let Some(percent) = session.progress.update(fraction) {
                println!("Downloading: {percent}%");
            }
        }
        AppEvent::FetchFinished(Ok(())) => println!("Dictionary ready"),
        AppEvent::FetchFinished(Err(e)) => println!("Download failed: {e}"),
        AppEvent::RequestFailed { request, message } => {
            println!("{request} failed: {message}");
        }
        AppEvent::ApiRequest(_) => {}
    }
}

fn mode_label(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::StartsWith => "starts with",
        SearchMode::Contains => "contains",
    }
}

fn print_page(page: &SearchPage) {
    if page.data.is_empty() {
        println!("No matches");
        return;
    }

    for word in &page.data {
        println!("  {}", to_palochka(word));
    }
    println!("page {}/{}", page.page, page.total_pages);
}

fn print_word(word: &WordWithEntries, filter: &LanguageFilter) {
    println!("{}", to_palochka(&word.word));

    for (label, side) in [("From", LanguageSide::From), ("To", LanguageSide::To)] {
        let options = language_options(&word.entries, side);
        if options.len() > 1 {
            println!("  {label}: {}", options.join(", "));
        }
    }

    let (shown, hidden) = filter.partition(&word.entries);
    for entry in shown {
        let dictionary = &entry.dictionary;
        println!(
            "[{}] {} -> {}",
            dictionary.title,
            display_name_or_code(&dictionary.from_lang),
            display_name_or_code(&dictionary.to_lang)
        );
        println!("{}", entry.html);
    }

    if !hidden.is_empty() {
        println!("{} filtered", hidden.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(parse_line("  псы "), Input::Search("псы".to_string()));
        assert_eq!(parse_line(""), Input::Blank);
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_line(":contains"), Input::Mode(SearchMode::Contains));
        assert_eq!(parse_line(":starts"), Input::Mode(SearchMode::StartsWith));
        assert_eq!(parse_line(":word  адыгэ "), Input::Word("адыгэ".to_string()));
        assert_eq!(parse_line(":more"), Input::More);
        assert_eq!(parse_line(":q"), Input::Quit);
        assert_eq!(parse_line(":word"), Input::Unknown(":word".to_string()));
        assert_eq!(parse_line(":bogus"), Input::Unknown(":bogus".to_string()));
    }

    #[test]
    fn stale_search_results_do_not_move_the_page() {
        let mut session = Session::new();
        session.query = Some("ка".to_string());
        let first = session.sequencer.next();
        let second = session.sequencer.next();

        handle_event(
            AppEvent::SearchResults {
                seq: first,
                page: SearchPage {
                    data: vec!["ка".to_string()],
                    page: 3,
                    total_pages: 3,
                },
            },
            &mut session,
        );
        assert_eq!(session.page, 1);

        handle_event(
            AppEvent::SearchResults {
                seq: second,
                page: SearchPage {
                    data: vec!["кб".to_string()],
                    page: 2,
                    total_pages: 3,
                },
            },
            &mut session,
        );
        assert_eq!(session.page, 2);
        assert_eq!(session.total_pages, 3);
    }

    #[test]
    fn language_commands_parse() {
        assert_eq!(parse_line(":from Kbd"), Input::From(Some("Kbd".to_string())));
        assert_eq!(parse_line(":to all"), Input::To(None));
        assert_eq!(parse_line(":from"), Input::From(None));
    }

    #[tokio::test]
    async fn failed_regate_drops_the_query_for_more() {
        let (ui_to_app_tx, ui_to_app_rx) = kanal::bounded_async(8);
        let (_app_to_ui_tx, app_to_ui_rx) = kanal::bounded_async(8);
        let channels = UiChannels {
            app_to_ui_rx,
            ui_to_app_tx,
        };
        let config = Config::default();
        let mut session = Session::new();

        handle_input(Input::Search("пс".to_string()), &mut session, &channels, &config)
            .await
            .unwrap();
        assert!(matches!(
            ui_to_app_rx.try_recv(),
            Ok(Some(AppEvent::ApiRequest(ApiRequest::Search(_))))
        ));
        session.total_pages = 3;

        handle_input(Input::Mode(SearchMode::Contains), &mut session, &channels, &config)
            .await
            .unwrap();
        assert!(session.query.is_none());

        handle_input(Input::More, &mut session, &channels, &config)
            .await
            .unwrap();
        assert!(matches!(ui_to_app_rx.try_recv(), Ok(None)));
    }
}
