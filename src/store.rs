use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{CompanyProfile, NewsItem, Sentiment};

/// Raw news row as it appears in the spreadsheet export. Header names are the
/// spreadsheet's own (Portuguese) column labels; a missing column fails the
/// whole load.
#[derive(Debug, serde::Deserialize)]
struct RawNewsRow {
    #[serde(rename = "Título")]
    titulo: String,
    #[serde(rename = "Conteúdo")]
    conteudo: String,
    #[serde(rename = "Data")]
    data: String,
    #[serde(rename = "Fonte")]
    fonte: String,
    #[serde(rename = "Sentimento")]
    sentimento: String,
    #[serde(rename = "Relevância")]
    relevancia: f32,
    #[serde(rename = "Palavras-chave")]
    palavras_chave: String,
    #[serde(rename = "Link")]
    link: String,
    #[serde(rename = "cluster")]
    cluster: String,
    #[serde(rename = "Tema")]
    tema: String,
}

#[derive(Debug, serde::Deserialize)]
struct RawCompanyRow {
    #[serde(rename = "Empresa")]
    empresa: String,
    #[serde(rename = "Comentário")]
    comentario: String,
}

/// In-memory record tables, loaded once at startup and handed to consumers by
/// reference. Read-only after load.
#[derive(Debug)]
pub struct RecordStore {
    news: Vec<NewsItem>,
    companies: Vec<CompanyProfile>,
}

impl RecordStore {
    pub fn load(news_path: &Path, companies_path: &Path) -> Result<Self> {
        let start = std::time::Instant::now();

        let news = load_news(news_path)?;
        let companies = load_companies(companies_path)?;

        info!(
            "Record store loaded - news={}, companies={}, duration={:.2}s",
            news.len(),
            companies.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(RecordStore { news, companies })
    }

    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    pub fn companies(&self) -> &[CompanyProfile] {
        &self.companies
    }

    /// Unique topic clusters in first-seen order.
    pub fn clusters(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for item in &self.news {
            if seen.insert(item.cluster.as_str()) {
                out.push(item.cluster.as_str());
            }
        }
        out
    }

    /// Min/max normalized dates across all news, if any records were loaded.
    /// ISO strings compare lexicographically, so plain min/max is correct.
    pub fn date_bounds(&self) -> Option<(&str, &str)> {
        let min = self.news.iter().map(|n| n.date.as_str()).min()?;
        let max = self.news.iter().map(|n| n.date.as_str()).max()?;
        Some((min, max))
    }
}

fn load_news(path: &Path) -> Result<Vec<NewsItem>> {
    debug!("Loading news spreadsheet - path={}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening news file {}", path.display()))?;

    let mut items = Vec::new();
    for (row_idx, row) in reader.deserialize::<RawNewsRow>().enumerate() {
        let raw = row.with_context(|| {
            format!("reading news row {} of {}", row_idx + 1, path.display())
        })?;
        let date = normalize_date(&raw.data).with_context(|| {
            format!(
                "news row {} of {}: unparseable date {:?}",
                row_idx + 1,
                path.display(),
                raw.data
            )
        })?;
        items.push(NewsItem {
            title: raw.titulo.trim().to_string(),
            body: raw.conteudo,
            date,
            source: raw.fonte,
            sentiment: Sentiment::parse(&raw.sentimento),
            relevance: raw.relevancia,
            keywords: raw.palavras_chave,
            link: raw.link,
            cluster: raw.cluster,
            theme: raw.tema,
        });
    }

    debug!("News loaded - rows={}", items.len());
    Ok(items)
}

fn load_companies(path: &Path) -> Result<Vec<CompanyProfile>> {
    debug!("Loading company spreadsheet - path={}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening companies file {}", path.display()))?;

    let mut companies = Vec::new();
    for (row_idx, row) in reader.deserialize::<RawCompanyRow>().enumerate() {
        let raw = row.with_context(|| {
            format!("reading company row {} of {}", row_idx + 1, path.display())
        })?;
        companies.push(CompanyProfile {
            name: raw.empresa.trim().to_string(),
            commentary: raw.comentario,
        });
    }

    debug!("Companies loaded - rows={}", companies.len());
    Ok(companies)
}

/// Normalize a spreadsheet date into `YYYY-MM-DD`. Accepts already-ISO days,
/// ISO timestamps ("2024-01-02 15:04:05" or with a `T`), and `DD/MM/YYYY`.
fn normalize_date(raw: &str) -> Result<String> {
    let s = raw.trim();
    let day_part = s
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or(s);

    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(day_part, fmt) {
            return Ok(d.to_string());
        }
    }
    anyhow::bail!("unsupported date format {:?}", raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NEWS_HEADER: &str =
        "Título,Conteúdo,Data,Fonte,Sentimento,Relevância,Palavras-chave,Link,cluster,Tema";

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn sample_files() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        let news = write_temp(&format!(
            "{NEWS_HEADER}\n\
             Acme expands,Acme opened a new plant,2024-01-01,Portal A,Positivo,0.9,acme;plant,http://a/1,energia-jan,Energia\n\
             Market dips,Stocks fell on Tuesday,02/01/2024,Portal B,Negativo,0.4,market,http://b/2,mercado-jan,Mercado\n\
             Quiet day,Nothing notable happened,2024-01-02 09:30:00,Portal A,Misto,0.1,calm,http://a/3,mercado-jan,Mercado\n"
        ));
        let companies = write_temp("Empresa,Comentário\nAcme,Solid quarter for Acme.\n");
        (news, companies)
    }

    #[test]
    fn load_normalizes_dates_and_sentiment() {
        let (news, companies) = sample_files();
        let store = RecordStore::load(news.path(), companies.path()).unwrap();

        let items = store.news();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].date, "2024-01-01");
        assert_eq!(items[1].date, "2024-01-02"); // DD/MM/YYYY input
        assert_eq!(items[2].date, "2024-01-02"); // timestamp input
        assert_eq!(items[0].sentiment, Sentiment::Positive);
        assert_eq!(items[2].sentiment, Sentiment::Other);
        assert_eq!(store.companies()[0].name, "Acme");
    }

    #[test]
    fn clusters_are_unique_in_first_seen_order() {
        let (news, companies) = sample_files();
        let store = RecordStore::load(news.path(), companies.path()).unwrap();
        assert_eq!(store.clusters(), vec!["energia-jan", "mercado-jan"]);
    }

    #[test]
    fn date_bounds_span_the_table() {
        let (news, companies) = sample_files();
        let store = RecordStore::load(news.path(), companies.path()).unwrap();
        assert_eq!(store.date_bounds(), Some(("2024-01-01", "2024-01-02")));
    }

    #[test]
    fn bad_date_aborts_the_load() {
        let news = write_temp(&format!(
            "{NEWS_HEADER}\nTitle,Body,not-a-date,Src,Neutro,0.5,k,http://x,c1,T1\n"
        ));
        let companies = write_temp("Empresa,Comentário\n");
        let err = RecordStore::load(news.path(), companies.path()).unwrap_err();
        assert!(err.to_string().contains("unparseable date"));
    }

    #[test]
    fn missing_column_aborts_the_load() {
        let news = write_temp("Título,Data\nTitle,2024-01-01\n");
        let companies = write_temp("Empresa,Comentário\n");
        assert!(RecordStore::load(news.path(), companies.path()).is_err());
    }

    #[test]
    fn missing_file_aborts_the_load() {
        let companies = write_temp("Empresa,Comentário\n");
        let err = RecordStore::load(Path::new("/nonexistent/news.csv"), companies.path());
        assert!(err.is_err());
    }
}
