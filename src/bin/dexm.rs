use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{ArgAction, Parser};
use dexclient::{
    ChapterDownloadRequest, ChapterDownloader, ClientConfigBuilder, DexClient, GetChapters, Query,
    Volume, VolumeChapter,
};
use tower::{Service, ServiceExt};
use tracing::debug;
use zip::{write::FileOptions, ZipWriter};

#[derive(Debug, Parser)]
#[command(
    name = "dexm",
    version,
    author,
    about = "CLI tool to download manga from mangadex"
)]
struct Arguments {
    #[arg(help = "manga id or url")]
    manga: String,
    #[arg(short, long, default_value_t = String::from("en"), help = "translation language")]
    language: String,
    #[arg(short, long, help = "translation group")]
    groups: Vec<String>,
    #[arg(
        short,
        long,
        help = "chapters to download, e.g. `12`, `3..7`, `20..` (repeatable)"
    )]
    chapters: Vec<Span>,
    #[arg(short, long, help = "volumes to download, same syntax as --chapters")]
    volumes: Vec<Span>,
    #[arg(short, long, default_value = ".", help = "destination folder")]
    path: PathBuf,
    #[arg(
        short = 'r',
        long = "raw",
        action = ArgAction::SetFalse,
        default_value_t = true,
        help = "download uncompressed images"
    )]
    data_saver: bool,
    #[arg(long, help = "pack the chapters into <title>.cbz")]
    make_cbz: bool,
    #[arg(long, default_value = dexclient::BASE_API, help = "api base url")]
    api_url: String,
}

/// Inclusive number range, open on a missing side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    min: Option<f32>,
    max: Option<f32>,
}

impl Span {
    fn contains(&self, n: f32) -> bool {
        self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max)
    }
}

impl FromStr for Span {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bound = |s: &str| -> Result<Option<f32>, String> {
            match s.trim() {
                "" => Ok(None),
                n => n
                    .parse()
                    .map(Some)
                    .map_err(|_| format!("'{n}' is not a number")),
            }
        };
        match s.split_once("..") {
            Some((min, max)) => Ok(Span {
                min: bound(min)?,
                max: bound(max)?,
            }),
            None => {
                let n = bound(s)?.ok_or("empty range")?;
                Ok(Span {
                    min: Some(n),
                    max: Some(n),
                })
            }
        }
    }
}

fn in_spans(spans: &[Span], number: Option<f32>) -> bool {
    spans.is_empty() || number.is_some_and(|n| spans.iter().any(|s| s.contains(n)))
}

/// Chapters of the aggregate matching both filters, ordered by number.
///
/// Chapters or volumes without a number only pass an empty filter.
fn select_chapters<'a>(
    volumes: &'a HashMap<String, Volume>,
    chapters: &[Span],
    in_volumes: &[Span],
) -> Vec<&'a VolumeChapter> {
    volumes
        .values()
        .filter(|v| in_spans(in_volumes, v.number()))
        .get_chapters()
        .into_iter()
        .filter(|c| in_spans(chapters, c.number()))
        .collect()
}

/// Folder name of a chapter, with the integer part padded so names sort.
fn chapter_dir_name(label: &str, width: usize) -> String {
    if label.parse::<f32>().is_err() {
        return format!("chapter_{label}");
    }
    let (int, frac) = label.split_at(label.find('.').unwrap_or(label.len()));
    format!("chapter_{int:0>width$}{frac}")
}

/// Makes a manga title usable as a file name.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    stem.trim().trim_end_matches('.').to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Arguments::parse();

    let manga_id = if args.manga.contains("mangadex.org") {
        dexclient::parse_title_url(&args.manga)?
    } else {
        args.manga.clone()
    };

    let client = DexClient::with_config(
        ClientConfigBuilder::default()
            .base_url(args.api_url.clone())
            .build()?,
    )?;

    let manga = client.manga().get(&manga_id, &Query::new()).await?;
    let title = match file_stem(manga.title(&args.language, true)) {
        stem if stem.is_empty() => manga_id.clone(),
        stem => stem,
    };
    println!("{title}");

    let mut query = Query::new().language(&args.language);
    for group in &args.groups {
        query = query.group(group);
    }
    let volumes = client.manga().aggregate(&manga_id, &query).await?;
    let chapters = select_chapters(&volumes, &args.chapters, &args.volumes);
    if chapters.is_empty() {
        println!("No chapter in '{}' matches the selection", args.language);
        return Ok(());
    }

    let width = chapters
        .iter()
        .filter_map(|c| c.number())
        .fold(0.0f32, f32::max)
        .max(1.0)
        .log10()
        .floor() as usize
        + 1;

    let manga_dir = args.path.join(&title);
    let mut download_service = ChapterDownloader::new(client);
    let mut downloaded = Vec::new();
    for chapter in chapters {
        let name = chapter_dir_name(chapter.chapter(), width);
        println!("Download {name}");
        let dir = manga_dir.join(&name);
        download_service
            .ready()
            .await?
            .call(
                ChapterDownloadRequest::new(chapter.id())
                    .data_saver(args.data_saver)
                    .path(&dir),
            )
            .await?;
        downloaded.push((name, dir));
    }

    if args.make_cbz {
        let cbz = args.path.join(format!("{title}.cbz"));
        println!("Making {}...", cbz.display());
        write_cbz(&cbz, &downloaded)?;
        fs::remove_dir_all(&manga_dir)?;
        println!("Done.");
    }

    Ok(())
}

/// Packs each `(name, dir)` chapter folder into `path` under `name/`.
fn write_cbz(path: &Path, chapters: &[(String, PathBuf)]) -> io::Result<()> {
    let mut writer = ZipWriter::new(fs::File::create(path)?);
    for (name, dir) in chapters {
        let mut pages = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        pages.retain(|p| p.is_file());
        pages.sort();
        for page in pages {
            let Some(file_name) = page.file_name() else {
                continue;
            };
            let entry = format!("{name}/{}", file_name.to_string_lossy());
            debug!(%entry);
            writer.start_file(entry, FileOptions::default())?;
            io::copy(&mut fs::File::open(&page)?, &mut writer)?;
        }
    }
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const AGGREGATE: &[u8] = br#"{"result":"ok","volumes":{
        "none":{"volume":"none","count":1,"chapters":{"none":{"chapter":"none","id":"oneshot","count":1}}},
        "1":{"volume":"1","count":2,"chapters":{
            "1":{"chapter":"1","id":"c1","count":1},
            "2":{"chapter":"2","id":"c2","count":1}}},
        "2":{"volume":"2","count":2,"chapters":{
            "2.5":{"chapter":"2.5","id":"c2.5","count":1},
            "10":{"chapter":"10","id":"c10","count":1}}}
    }}"#;

    fn volumes() -> HashMap<String, Volume> {
        dexclient::decode::<dexclient::AggregateResponse>(AGGREGATE)
            .unwrap()
            .into_volumes()
            .unwrap()
    }

    fn ids(chapters: Vec<&VolumeChapter>) -> Vec<&str> {
        chapters.into_iter().map(|c| c.id().as_str()).collect()
    }

    #[test]
    fn test_span_parse() {
        assert_eq!(
            "3".parse::<Span>().unwrap(),
            Span {
                min: Some(3.0),
                max: Some(3.0)
            }
        );
        assert_eq!(
            "2.5..".parse::<Span>().unwrap(),
            Span {
                min: Some(2.5),
                max: None
            }
        );
        assert!("..4".parse::<Span>().unwrap().contains(-1.0));
        assert!("a..b".parse::<Span>().is_err());
        assert!("".parse::<Span>().is_err());
    }

    #[test]
    fn test_select_all() {
        let volumes = volumes();
        assert_eq!(
            ids(select_chapters(&volumes, &[], &[])),
            vec!["oneshot", "c1", "c2", "c2.5", "c10"]
        );
    }

    #[test]
    fn test_select_chapters_and_volumes() {
        let volumes = volumes();
        let chapters = ["2..3".parse().unwrap(), "10".parse().unwrap()];
        assert_eq!(
            ids(select_chapters(&volumes, &chapters, &[])),
            vec!["c2", "c2.5", "c10"]
        );

        let in_volumes = ["1".parse().unwrap()];
        assert_eq!(
            ids(select_chapters(&volumes, &chapters, &in_volumes)),
            vec!["c2"]
        );
    }

    #[test]
    fn test_chapter_dir_name() {
        assert_eq!(chapter_dir_name("2.5", 2), "chapter_02.5");
        assert_eq!(chapter_dir_name("10", 2), "chapter_10");
        assert_eq!(chapter_dir_name("none", 2), "chapter_none");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Fate/Zero: Vol. 1?"), "Fate_Zero_ Vol. 1_");
        assert_eq!(file_stem("  Title...  "), "Title");
    }

    #[test]
    fn test_write_cbz() {
        let tmpdir = tempfile::tempdir().unwrap();
        let dir = tmpdir.path().join("chapter_1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page_1.jpg"), b"b").unwrap();
        fs::write(dir.join("page_0.jpg"), b"a").unwrap();

        let cbz = tmpdir.path().join("title.cbz");
        write_cbz(&cbz, &[("chapter_1".to_string(), dir)]).unwrap();

        let archive = zip::ZipArchive::new(fs::File::open(cbz).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"chapter_1/page_0.jpg"));
        assert!(names.contains(&"chapter_1/page_1.jpg"));
    }
}
