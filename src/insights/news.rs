use super::seed::{derive_seed, SynthesisContext};
use super::sequence::{SeededStream, SymbolChannel};
use crate::models::{NewsCategory, NewsItem, NewsSource, Sentiment};
use serde::{Deserialize, Serialize};

/// One entry of the fixed corpus. `{symbol}` in title/summary is substituted.
struct CorpusEntry {
    title: &'static str,
    source: NewsSource,
    category: NewsCategory,
    url: &'static str,
    summary: &'static str,
}

pub const CORPUS_SIZE: usize = 8;
const MIN_SELECTION: usize = 6;

fn corpus() -> [CorpusEntry; CORPUS_SIZE] {
    [
        CorpusEntry {
            title: "{symbol}: Institutional investors increase stake amid strong quarterly results",
            source: NewsSource::EconomicTimes,
            category: NewsCategory::General,
            url: "https://economictimes.indiatimes.com",
            summary: "Foreign institutional investors have been increasing their holdings in {symbol} \
                      following better-than-expected quarterly earnings, signaling confidence in the \
                      company's growth trajectory.",
        },
        CorpusEntry {
            title: "India-US trade deal negotiations enter final stage, tech sector to benefit",
            source: NewsSource::Bloomberg,
            category: NewsCategory::IndiaTradeDeals,
            url: "https://bloomberg.com",
            summary: "Bilateral trade negotiations between India and the United States are progressing, \
                      with technology and pharmaceutical sectors expected to see reduced tariff barriers.",
        },
        CorpusEntry {
            title: "SEBI tightens F&O regulations: New margin requirements from next quarter",
            source: NewsSource::Mint,
            category: NewsCategory::Regulatory,
            url: "https://livemint.com",
            summary: "The Securities and Exchange Board of India has announced stricter margin \
                      requirements for futures and options trading, effective from the next quarter.",
        },
        CorpusEntry {
            title: "Global markets rally as Fed signals pause in rate hikes",
            source: NewsSource::Reuters,
            category: NewsCategory::WorldMarkets,
            url: "https://reuters.com",
            summary: "World equity markets surged after Federal Reserve officials indicated a potential \
                      pause in interest rate increases, boosting risk appetite globally.",
        },
        CorpusEntry {
            title: "Import duties on electronics components revised downward",
            source: NewsSource::Cnbc,
            category: NewsCategory::ImportExport,
            url: "https://cnbctv18.com",
            summary: "The government has reduced import duties on key electronics components to boost \
                      domestic manufacturing under the PLI scheme.",
        },
        CorpusEntry {
            title: "New tariff structure for steel imports announced",
            source: NewsSource::Bloomberg,
            category: NewsCategory::Tariffs,
            url: "https://bloomberg.com",
            summary: "The Ministry of Commerce has announced revised tariff rates for steel imports, \
                      impacting domestic steel producers and downstream industries.",
        },
        CorpusEntry {
            title: "{symbol} Q3 results: Revenue beats estimates, margins under pressure",
            source: NewsSource::EconomicTimes,
            category: NewsCategory::General,
            url: "https://economictimes.indiatimes.com",
            summary: "{symbol} reported Q3 revenue above analyst estimates but operating margins \
                      contracted due to higher input costs and increased employee expenses.",
        },
        CorpusEntry {
            title: "Asian markets mixed as China data disappoints",
            source: NewsSource::Bbc,
            category: NewsCategory::WorldMarkets,
            url: "https://bbc.com/news/business",
            summary: "Asian equity markets showed mixed performance as weaker-than-expected Chinese \
                      economic data dampened sentiment, while Japanese markets outperformed.",
        },
    ]
}

/// Sentiment from one draw: > 0.6 positive, < 0.3 negative, otherwise neutral
pub fn classify_sentiment(unit_draw: f64) -> Sentiment {
    if unit_draw > 0.6 {
        Sentiment::Positive
    } else if unit_draw < 0.3 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Sample the corpus for `symbol` on the context's date
pub fn sample_news(symbol: &str, ctx: &SynthesisContext) -> Vec<NewsItem> {
    sample_news_from_seed(symbol, derive_seed(symbol, ctx.date), ctx)
}

/// Classify, shuffle and truncate the corpus.
///
/// The order is a permutation keyed by (seed, corpus index): each item gets
/// its own draw and items are sorted by it, ties falling back to corpus order.
pub fn sample_news_from_seed(symbol: &str, seed: i64, ctx: &SynthesisContext) -> Vec<NewsItem> {
    let stream = SeededStream::new(seed);

    let mut keyed: Vec<(f64, usize, NewsItem)> = corpus()
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let item = NewsItem {
                title: entry.title.replace("{symbol}", symbol),
                source: entry.source,
                category: entry.category,
                sentiment: classify_sentiment(stream.unit(SymbolChannel::ArticleSentiment(i as u8))),
                summary: entry.summary.replace("{symbol}", symbol),
                url: entry.url.to_string(),
                published_at: ctx.generated_at,
            };
            (stream.unit(SymbolChannel::ArticleOrder(i as u8)), i, item)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let count = selection_count(stream.unit(SymbolChannel::ArticleCount));
    keyed.into_iter().take(count).map(|(_, _, item)| item).collect()
}

/// 6 + floor(draw * 3), capped at the corpus size
pub fn selection_count(unit_draw: f64) -> usize {
    (MIN_SELECTION + (unit_draw * 3.0).floor() as usize).min(CORPUS_SIZE)
}

// -----------------------------------------------
// CATEGORY TABS
// -----------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NewsTab {
    #[default]
    All,
    WorldMarkets,
    IndiaTradeDeals,
    /// Tariffs and import/export combined
    Tariffs,
    Regulatory,
}

impl NewsTab {
    pub const ALL_TABS: [NewsTab; 5] = [
        NewsTab::All,
        NewsTab::WorldMarkets,
        NewsTab::IndiaTradeDeals,
        NewsTab::Tariffs,
        NewsTab::Regulatory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NewsTab::All => "All",
            NewsTab::WorldMarkets => "World Markets",
            NewsTab::IndiaTradeDeals => "India Trade Deals",
            NewsTab::Tariffs => "Tariffs & Import/Export",
            NewsTab::Regulatory => "Regulatory",
        }
    }

    pub fn includes(self, category: NewsCategory) -> bool {
        match self {
            NewsTab::All => true,
            NewsTab::WorldMarkets => category == NewsCategory::WorldMarkets,
            NewsTab::IndiaTradeDeals => category == NewsCategory::IndiaTradeDeals,
            NewsTab::Tariffs => matches!(category, NewsCategory::Tariffs | NewsCategory::ImportExport),
            NewsTab::Regulatory => category == NewsCategory::Regulatory,
        }
    }
}

/// Items belonging to a tab, in their original order
pub fn filter_by_tab(items: &[NewsItem], tab: NewsTab) -> Vec<NewsItem> {
    items.iter().filter(|item| tab.includes(item.category)).cloned().collect()
}
