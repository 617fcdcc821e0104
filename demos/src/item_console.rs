//! Interactive terminal front-end for the item backend.
//!
//! Reads `ITEM_API_BASE_URL` (from the environment or a `.env` file) and
//! drives the list, detail and form screens from stdin commands.

use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use item_manager::detail::{DetailView, DetailViewer};
use item_manager::form::{FormController, ACCEPTED_FILE_TYPES};
use item_manager::list::{ListController, ListView};
use item_manager::prelude::*;

const HELP: &str = "\
commands:
  list                 reload the list
  search [text]        search by name (empty clears the filter)
  sort name|price      sort by a column; repeat to flip the direction
  show <id>            item details
  new                  create an item
  edit <id>            update an item
  delete <id>          delete an item
  open <path>          open a route such as /item/3 or /update/3
  help                 this text
  quit";

/// Confirmation prompt answered on stdin
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        matches!(
            read_line(&format!("{} [y/N] ", prompt)).as_deref(),
            Some("y") | Some("Y") | Some("yes")
        )
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Prompt with a default that is kept when the answer is empty.
fn read_with_default(label: &str, current: &str) -> String {
    let prompt = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    };
    match read_line(&prompt) {
        Some(answer) if !answer.is_empty() => answer,
        _ => current.to_string(),
    }
}

fn sort_arrow(list: &ListController, field: SortField) -> &'static str {
    match list.sort_indicator(field) {
        Some(SortOrder::Asc) => " ▲",
        Some(SortOrder::Desc) => " ▼",
        None => "",
    }
}

fn render_list(list: &ListController) {
    let rows = match list.view() {
        ListView::Loading => {
            println!("Loading...");
            return;
        }
        ListView::Table(rows) => rows,
    };

    println!(
        "{:>5}  {:<24} {:<14} {:<14} {:>10}  Image",
        "ID",
        format!("Name{}", sort_arrow(list, SortField::Name)),
        "Type",
        "Category",
        format!("Price{}", sort_arrow(list, SortField::Price)),
    );
    for row in rows {
        println!(
            "{:>5}  {:<24} {:<14} {:<14} {:>10}  {}",
            row.id,
            row.name,
            row.item_type,
            row.category,
            row.price,
            row.image.url().unwrap_or("-"),
        );
    }
}

fn render_detail(detail: &DetailViewer) {
    match detail.view() {
        DetailView::Loading => println!("Loading..."),
        DetailView::NotFound => println!("Item not found"),
        DetailView::Item { item, image } => {
            println!("Name:     {}", item.name);
            println!("Type:     {}", item.item_type);
            println!("Category: {}", item.category);
            println!("Price:    ${}", item.price);
            println!("Image:    {}", image.url().unwrap_or("-"));
        }
    }
}

async fn run_form(form: &mut FormController) {
    println!("== {} ==", form.title());
    if let Some(image) = form.current_image_ref().and_then(|i| i.url().map(str::to_string)) {
        println!("Current image: {}", image);
    }

    let fields = form.fields().clone();
    form.set_field(FormField::Name, &read_with_default("Name", &fields.name));
    form.set_field(FormField::Type, &read_with_default("Type", &fields.item_type));
    form.set_field(
        FormField::Category,
        &read_with_default("Category", &fields.category),
    );
    form.set_field(FormField::Price, &read_with_default("Price", &fields.price));

    let file_prompt = format!("File to upload ({}), blank for none: ", ACCEPTED_FILE_TYPES);
    if let Some(path) = read_line(&file_prompt).filter(|p| !p.is_empty()) {
        match Attachment::from_path(Path::new(&path)).await {
            Ok(file) => form.attach(Some(file)),
            Err(e) => println!("Cannot read {}: {}", path, e),
        }
    }

    println!("{}", form.submit_label());
    match form.submit().await {
        SubmitOutcome::Saved { item, upload } => {
            println!("Saved item #{} ({:?})", item.id, upload);
        }
        SubmitOutcome::Failed(message) => println!("Not saved: {}", message),
        SubmitOutcome::Busy => println!("Already saving"),
    }
}

async fn open_route(manager: &ItemManager, list: &mut ListController, route: Route) {
    if route == Route::List {
        list.refresh().await;
        render_list(list);
        return;
    }

    match manager.open(route).await {
        Screen::List(opened) => render_list(&opened),
        Screen::Detail(detail) => render_detail(&detail),
        Screen::Form(mut form) => {
            run_form(&mut form).await;
            list.refresh().await;
            render_list(list);
        }
    }
}

fn parse_id(arg: Option<&str>) -> Option<i64> {
    let id = arg.and_then(|a| a.parse::<i64>().ok());
    if id.is_none() {
        println!("Invalid or missing ID");
    }
    id
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "item_manager=info,item_manager_api=warn".into()),
        )
        .with_target(false)
        .init();

    let options = ClientOptions::from_env()?;
    tracing::info!(base_url = %options.base_url, "starting item console");

    let manager = ItemManager::new(
        options,
        Arc::new(LogNotifier),
        Arc::new(History::new()),
        Arc::new(StdinConfirm),
    )?;

    let mut list = manager.list();
    list.initialize().await;
    render_list(&list);
    println!("{}", HELP);

    while let Some(line) = read_line("> ") {
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, Some(arg.trim())),
            None => (line.as_str(), None),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "list" => {
                list.refresh().await;
                render_list(&list);
            }
            "search" => {
                list.search(arg.unwrap_or("")).await;
                render_list(&list);
            }
            "sort" => match arg {
                Some("name") => {
                    list.toggle_sort(SortField::Name).await;
                    render_list(&list);
                }
                Some("price") => {
                    list.toggle_sort(SortField::Price).await;
                    render_list(&list);
                }
                _ => println!("sort by name or price"),
            },
            "show" => {
                if let Some(id) = parse_id(arg) {
                    open_route(&manager, &mut list, Route::Detail(id)).await;
                }
            }
            "new" => open_route(&manager, &mut list, Route::Create).await,
            "edit" => {
                if let Some(id) = parse_id(arg) {
                    open_route(&manager, &mut list, Route::Update(id)).await;
                }
            }
            "delete" => {
                if let Some(id) = parse_id(arg) {
                    if list.delete_item(id).await == DeleteOutcome::Deleted {
                        render_list(&list);
                    }
                }
            }
            "open" => match Route::parse(arg.unwrap_or("/")) {
                Ok(route) => open_route(&manager, &mut list, route).await,
                Err(e) => println!("{}", e),
            },
            other => println!("unknown command: {} (try help)", other),
        }
    }

    Ok(())
}
