use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Market segment of a tradable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetCategory {
    Stocks,
    Forex,
    Commodities,
    Indices,
    Crypto,
}

impl AssetCategory {
    pub const ALL: [Self; 5] = [
        Self::Stocks,
        Self::Forex,
        Self::Commodities,
        Self::Indices,
        Self::Crypto,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Forex => "Forex",
            Self::Commodities => "Commodities",
            Self::Indices => "Indices",
            Self::Crypto => "Crypto",
        }
    }
}

impl Display for AssetCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: value.to_owned(),
            })
    }
}

/// News topic selector: every market, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewsCategory {
    #[default]
    All,
    Category(AssetCategory),
}

impl NewsCategory {
    /// Topic phrase embedded into the news prompt.
    pub const fn topic(self) -> &'static str {
        match self {
            Self::All => "general financial markets",
            Self::Category(category) => category.as_str(),
        }
    }
}

impl FromStr for NewsCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Category)
    }
}

/// Named asset with its market segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub category: AssetCategory,
}

impl Asset {
    pub fn new(name: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Read-only asset table plus the charting-symbol lookup tables.
///
/// Injected into [`crate::AnalystClient`] instead of living in a global so
/// tests can swap in their own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
    symbol_overrides: BTreeMap<String, String>,
    stock_exchanges: BTreeMap<String, String>,
}

const DEFAULT_STOCK_EXCHANGE: &str = "NASDAQ";

const DEFAULT_ASSETS: &[(&str, AssetCategory)] = &[
    ("Apple (AAPL)", AssetCategory::Stocks),
    ("Microsoft (MSFT)", AssetCategory::Stocks),
    ("Amazon (AMZN)", AssetCategory::Stocks),
    ("Alphabet (GOOGL)", AssetCategory::Stocks),
    ("Meta Platforms (META)", AssetCategory::Stocks),
    ("Tesla (TSLA)", AssetCategory::Stocks),
    ("NVIDIA (NVDA)", AssetCategory::Stocks),
    ("Berkshire Hathaway (BRK.B)", AssetCategory::Stocks),
    ("Johnson & Johnson (JNJ)", AssetCategory::Stocks),
    ("JPMorgan Chase (JPM)", AssetCategory::Stocks),
    ("Visa (V)", AssetCategory::Stocks),
    ("Walmart (WMT)", AssetCategory::Stocks),
    ("Procter & Gamble (PG)", AssetCategory::Stocks),
    ("UnitedHealth Group (UNH)", AssetCategory::Stocks),
    ("Exxon Mobil (XOM)", AssetCategory::Stocks),
    ("EUR/USD", AssetCategory::Forex),
    ("GBP/USD", AssetCategory::Forex),
    ("USD/JPY", AssetCategory::Forex),
    ("AUD/USD", AssetCategory::Forex),
    ("USD/CAD", AssetCategory::Forex),
    ("USD/CHF", AssetCategory::Forex),
    ("EUR/GBP", AssetCategory::Forex),
    ("Gold (XAU/USD)", AssetCategory::Commodities),
    ("Gold (XAU/EUR)", AssetCategory::Commodities),
    ("Gold (XAU/JPY)", AssetCategory::Commodities),
    ("Silver (XAG/USD)", AssetCategory::Commodities),
    ("Silver (XAG/EUR)", AssetCategory::Commodities),
    ("Natural Gas (XNG/USD)", AssetCategory::Commodities),
    ("Crude Oil (USOIL)", AssetCategory::Commodities),
    ("S&P 500 (INX)", AssetCategory::Indices),
    ("NASDAQ 100 (NDX / US100)", AssetCategory::Indices),
    ("Dow Jones (DJI / US30)", AssetCategory::Indices),
    ("U.S. Dollar Index (DXY)", AssetCategory::Indices),
    ("DAX 40 (GER40)", AssetCategory::Indices),
    ("FTSE 100 (UK100)", AssetCategory::Indices),
    ("Bitcoin (BTCUSDT)", AssetCategory::Crypto),
    ("Ethereum (ETHUSDT)", AssetCategory::Crypto),
    ("Solana (SOLUSDT)", AssetCategory::Crypto),
    ("XRP (XRPUSDT)", AssetCategory::Crypto),
    ("Tether (USDTUSD)", AssetCategory::Crypto),
];

const DEFAULT_SYMBOL_OVERRIDES: &[(&str, &str)] = &[
    ("Gold (XAU/USD)", "OANDA:XAUUSD"),
    ("Silver (XAG/USD)", "OANDA:XAGUSD"),
    ("Tether (USDTUSD)", "USDTUSD"),
    ("NASDAQ 100 (NDX / US100)", "NASDAQ:NDX"),
    ("Dow Jones (DJI / US30)", "PEPPERSTONE:US30"),
    ("S&P 500 (INX)", "SPX"),
    ("U.S. Dollar Index (DXY)", "FXOPEN:DXY"),
    ("Gold (XAU/EUR)", "OANDA:XAUEUR"),
    ("Gold (XAU/JPY)", "OANDA:XAUJPY"),
    ("Silver (XAG/EUR)", "OANDA:XAGEUR"),
    ("Natural Gas (XNG/USD)", "NATURALGAS"),
];

const DEFAULT_STOCK_EXCHANGES: &[(&str, &str)] = &[
    ("AAPL", "NASDAQ"),
    ("MSFT", "NASDAQ"),
    ("AMZN", "NASDAQ"),
    ("GOOGL", "NASDAQ"),
    ("META", "NASDAQ"),
    ("TSLA", "NASDAQ"),
    ("NVDA", "NASDAQ"),
    ("BRK.B", "NYSE"),
    ("JNJ", "NYSE"),
    ("JPM", "NYSE"),
    ("V", "NYSE"),
    ("WMT", "NYSE"),
    ("PG", "NYSE"),
    ("UNH", "NYSE"),
    ("XOM", "NYSE"),
];

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_ASSETS
                .iter()
                .map(|(name, category)| Asset::new(*name, *category))
                .collect(),
        )
        .with_symbol_overrides(DEFAULT_SYMBOL_OVERRIDES.iter().copied())
        .with_stock_exchanges(DEFAULT_STOCK_EXCHANGES.iter().copied())
    }
}

impl AssetCatalog {
    /// Catalog with the given assets and empty symbol tables.
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            symbol_overrides: BTreeMap::new(),
            stock_exchanges: BTreeMap::new(),
        }
    }

    pub fn with_symbol_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.symbol_overrides.extend(
            overrides
                .into_iter()
                .map(|(name, symbol)| (name.to_owned(), symbol.to_owned())),
        );
        self
    }

    pub fn with_stock_exchanges<'a>(
        mut self,
        exchanges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.stock_exchanges.extend(
            exchanges
                .into_iter()
                .map(|(ticker, exchange)| (ticker.to_owned(), exchange.to_owned())),
        );
        self
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn find(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    pub fn in_category(&self, category: AssetCategory) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(move |asset| asset.category == category)
    }

    /// Maps an asset name to the symbol understood by the embedded charting widget.
    pub fn chart_symbol(&self, name: &str) -> String {
        if let Some(symbol) = self.symbol_overrides.get(name) {
            return symbol.clone();
        }

        let Some(asset) = self.find(name) else {
            return name.replace('/', "");
        };

        let ticker = match parenthesized(name) {
            Some(inner) => inner
                .split(" / ")
                .next()
                .unwrap_or(inner)
                .replace('/', ""),
            None => name.replace('/', ""),
        };

        match asset.category {
            AssetCategory::Stocks => {
                let exchange = self
                    .stock_exchanges
                    .get(&ticker)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_STOCK_EXCHANGE);
                format!("{exchange}:{ticker}")
            }
            AssetCategory::Crypto => format!("BINANCE:{ticker}"),
            AssetCategory::Forex => ticker,
            AssetCategory::Indices => format!("PEPPERSTONE:{ticker}"),
            AssetCategory::Commodities => format!("TVC:{ticker}"),
        }
    }
}

/// Contents of the first non-empty parenthesized group, e.g. `AAPL` in `Apple (AAPL)`.
fn parenthesized(name: &str) -> Option<&str> {
    let open = name.find('(')?;
    let rest = &name[open + 1..];
    let close = rest.find(')')?;
    let inner = &rest[..close];
    (!inner.is_empty()).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_priority() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.chart_symbol("Gold (XAU/USD)"), "OANDA:XAUUSD");
        assert_eq!(catalog.chart_symbol("S&P 500 (INX)"), "SPX");
    }

    #[test]
    fn stocks_use_exchange_table_with_nasdaq_fallback() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.chart_symbol("JPMorgan Chase (JPM)"), "NYSE:JPM");
        assert_eq!(catalog.chart_symbol("Apple (AAPL)"), "NASDAQ:AAPL");

        let custom = AssetCatalog::new(vec![Asset::new("Shopify (SHOP)", AssetCategory::Stocks)]);
        assert_eq!(custom.chart_symbol("Shopify (SHOP)"), "NASDAQ:SHOP");
    }

    #[test]
    fn category_prefixes_apply_to_parenthesized_tickers() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.chart_symbol("Bitcoin (BTCUSDT)"), "BINANCE:BTCUSDT");
        assert_eq!(catalog.chart_symbol("EUR/USD"), "EURUSD");
        assert_eq!(catalog.chart_symbol("DAX 40 (GER40)"), "PEPPERSTONE:GER40");
        assert_eq!(catalog.chart_symbol("Crude Oil (USOIL)"), "TVC:USOIL");
    }

    #[test]
    fn first_alias_is_used_when_ticker_lists_several() {
        let catalog = AssetCatalog::new(vec![Asset::new(
            "Russell 2000 (RUT / US2000)",
            AssetCategory::Indices,
        )]);
        assert_eq!(catalog.chart_symbol("Russell 2000 (RUT / US2000)"), "PEPPERSTONE:RUT");
    }

    #[test]
    fn in_category_keeps_catalog_order() {
        let catalog = AssetCatalog::new(vec![
            Asset::new("Solana (SOLUSDT)", AssetCategory::Crypto),
            Asset::new("EUR/USD", AssetCategory::Forex),
            Asset::new("Bitcoin (BTCUSDT)", AssetCategory::Crypto),
        ]);

        let names: Vec<&str> = catalog
            .in_category(AssetCategory::Crypto)
            .map(|asset| asset.name.as_str())
            .collect();
        assert_eq!(names, ["Solana (SOLUSDT)", "Bitcoin (BTCUSDT)"]);
    }

    #[test]
    fn unknown_assets_fall_back_to_slashless_name() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.chart_symbol("NZD/USD"), "NZDUSD");
    }

    #[test]
    fn parses_news_categories() {
        assert_eq!("all".parse::<NewsCategory>(), Ok(NewsCategory::All));
        assert_eq!(
            "crypto".parse::<NewsCategory>(),
            Ok(NewsCategory::Category(AssetCategory::Crypto))
        );
        assert!("bonds".parse::<NewsCategory>().is_err());
        assert_eq!(NewsCategory::All.topic(), "general financial markets");
    }
}
