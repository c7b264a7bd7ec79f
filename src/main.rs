mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use komivox::api::ComicApi;
use komivox::card::ComicCard;
use komivox::config::ClientConfig;
use komivox::feed::{collect_all, HomeView};
use komivox::genre::{comics_for_genre, filter_genres, genre_display_name};
use komivox::mapping::{display_synopsis, display_title, filter_by_title};
use komivox::reader::{ChapterNav, LazyPages, PageSlot};
use komivox::routes::Route;
use komivox::types::{Chapter, ComicPage};
use komivox::urls::{chapter_badge, chapter_path, parse_chapter_segment, ImageUrlRepair};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("komivox=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    let api = ComicApi::from_config(&config)?;
    let images = ImageUrlRepair::new(&config.images);

    match cli.command {
        Commands::Latest { page } => print_page(&api.latest_comics(page).await?, &images),
        Commands::Popular { page } => print_page(&api.popular_comics(page).await?, &images),
        Commands::Realtime { count, fresh } => print_page(&api.realtime_comics(count, fresh).await?, &images),
        Commands::Scroll { offset, batch_size } => print_page(&api.scroll_comics(offset, batch_size).await?, &images),
        Commands::Search { query } => {
            let res = api.search(&query).await?;
            println!("Hasil pencarian untuk \"{}\" ({})", query, res.results.len());
            for hit in &res.results {
                print_card(&ComicCard::from_search(hit, &images));
            }
        }
        Commands::Detail { slug } => {
            let detail = api.comic_detail(&slug).await?;
            println!("{}", display_title(&detail, &slug));
            println!("{}\n", display_synopsis(&detail));
            for (i, ch) in detail.chapters.iter().enumerate() {
                println!("  [{}] {} -> {}", chapter_badge(&ch.chapter, i), ch.chapter, Route::read_link(&ch.link));
            }
        }
        Commands::Read { segments } => read(&api, &segments).await?,
        Commands::Home => {
            let home = HomeView::load(&api).await;
            println!("Komik Terbaru");
            for comic in home.latest.comics() {
                print_card(&ComicCard::from_summary(comic, &images));
            }
            println!("\nKomik Populer");
            for comic in &home.popular {
                print_card(&ComicCard::from_summary(comic, &images));
            }
        }
        Commands::All { filter, batch_size, max_batches } => {
            let all = collect_all(&api, batch_size, max_batches).await?;
            let shown = filter_by_title(&all, filter.as_deref().unwrap_or_default());
            println!("{} of {} comics", shown.len(), all.len());
            for comic in shown {
                print_card(&ComicCard::from_summary(comic, &images));
            }
        }
        Commands::Genres { filter } => {
            for g in filter_genres(filter.as_deref().unwrap_or_default()) {
                println!("{:<14} {}  {}", g.name, g.description, Route::Genre(g.name.to_string()));
            }
        }
        Commands::Genre { name } => {
            println!("Genre: {}", genre_display_name(&name));
            print_page(&comics_for_genre(&api, &name).await?, &images);
        }
    }
    Ok(())
}

fn print_card(card: &ComicCard) {
    let rank = card.popularity_badge().map(|b| format!("{b} ")).unwrap_or_default();
    println!("  {rank}{} [{}] {}  {}", card.title, card.chapter, card.route, card.image);
}

fn print_page(page: &ComicPage, images: &ImageUrlRepair) {
    let p = page.pagination;
    println!("page {} ({} per page, {} total, more: {})", p.current_page, p.per_page, p.total, p.has_more);
    for comic in &page.comics {
        print_card(&ComicCard::from_summary(comic, images));
    }
}

async fn read(api: &ComicApi, segments: &[String]) -> Result<()> {
    let path = chapter_path(segments);
    let chapter = api.chapter_images(&path).await?;
    let pages = LazyPages::new(chapter.images);
    if pages.is_empty() {
        println!("Chapter Tidak Ditemukan");
        return Ok(());
    }
    for slot in pages.render_plan() {
        match slot {
            PageSlot::Image { index, url, eager } => println!("  {:>3} {}{}", index + 1, url, if eager { " (eager)" } else { "" }),
            PageSlot::Placeholder { label, .. } => println!("      {label}"),
        }
    }

    let last = segments.last().map(String::as_str).unwrap_or_default();
    let (slug, number) = parse_chapter_segment(last).with_context(|| format!("not a chapter segment: {last}"))?;
    let detail = api.comic_detail(slug).await?;
    let nav = ChapterNav::by_link(&detail.chapters, &path).or_else(|| ChapterNav::by_label(&detail.chapters, number));
    match nav {
        Some(nav) => {
            let show = |label: &str, ch: Option<&Chapter>| {
                if let Some(ch) = ch {
                    println!("{label}: {} {}", ch.chapter, Route::read_link(&ch.link));
                }
            };
            show("previous", nav.previous());
            show("next", nav.next());
        }
        None => println!("chapter not in the list of {}", display_title(&detail, slug)),
    }
    Ok(())
}
