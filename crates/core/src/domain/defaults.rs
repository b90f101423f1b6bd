use crate::domain::stock::{StockRecord, Volatility};

/// Built-in SGX collection served when no backend holds data. Never written
/// back automatically.
pub fn default_stocks() -> Vec<StockRecord> {
    vec![
        stock(
            "DBS Group",
            "D05",
            [72, 82, 98],
            5.2,
            Volatility::Low,
            [
                "Voted World's Best Bank 5 times.",
                "Quarterly dividends; highly reliable.",
                "Expansion into digital assets & carbon exchange.",
                "Top-tier Governance compared to regional banks.",
                "www.dbs.com/investors",
                "Interest rate sensitivity.",
            ],
        ),
        stock(
            "Sembcorp Ind.",
            "U96",
            [96, 68, 75],
            3.8,
            Volatility::Med,
            [
                "SG's largest renewable energy player.",
                "Steady growth; payouts linked to green profit.",
                "Scaling brown-to-green energy transition.",
                "Leading the utilities sector in ESG metrics.",
                "www.sembcorp.com",
                "Energy transition execution.",
            ],
        ),
        stock(
            "City Develop.",
            "C09",
            [94, 88, 90],
            2.8,
            Volatility::Low,
            [
                "Pioneer in green building since 2000s.",
                "Conservative but consistent annual payouts.",
                "Global expansion of sustainable luxury hotels.",
                "Ranked #1 most sustainable real estate firm.",
                "www.cdl.com.sg",
                "Property cycle exposure.",
            ],
        ),
        stock(
            "Singtel",
            "Z74",
            [82, 92, 88],
            5.4,
            Volatility::Low,
            [
                "Deep focus on workplace disability inclusion.",
                "Reliable 'Dividend Aristocrat' in Singapore.",
                "Next-gen 5G and green data center growth.",
                "Superior social score over regional telcos.",
                "www.singtel.com",
                "Competition in regional markets.",
            ],
        ),
        stock(
            "OCBC Bank",
            "O39",
            [75, 80, 94],
            5.8,
            Volatility::Low,
            [
                "Strongest capital ratios in SE Asia.",
                "High yield; strong payout history.",
                "ASEAN-Greater China wealth management hub.",
                "More value-oriented than DBS with similar G.",
                "www.ocbc.com",
                "Credit cycle exposure.",
            ],
        ),
        stock(
            "CapitaLand Ascas",
            "A17U",
            [85, 78, 82],
            6.2,
            Volatility::Med,
            [
                "Dominant in eco-friendly logistics space.",
                "High REIT distribution payouts (DPU).",
                "High-tech industrial space demand surge.",
                "Largest industrial REIT in Singapore.",
                "www.capitaland.com",
                "Interest rate sensitivity.",
            ],
        ),
        stock(
            "SIA",
            "C6L",
            [68, 85, 82],
            4.5,
            Volatility::High,
            [
                "Pioneering Sustainable Aviation Fuel (SAF).",
                "Resumed payouts following profit records.",
                "Full travel recovery and fleet modernization.",
                "Global brand leader in aviation sustainability.",
                "www.singaporeair.com",
                "Oil price and travel demand volatility.",
            ],
        ),
        stock(
            "Keppel Ltd",
            "BN4",
            [88, 76, 80],
            4.3,
            Volatility::Med,
            [
                "Global asset manager for clean infra.",
                "Competitive semi-annual distributions.",
                "Asset-light model boosting return on equity.",
                "Pivoting faster than traditional conglomerates.",
                "www.keppel.com",
                "Asset recycling execution.",
            ],
        ),
        stock(
            "MapleTree Pan Asia",
            "N2IU",
            [78, 82, 80],
            6.5,
            Volatility::Med,
            [
                "Owns VivoCity, SG's largest mall.",
                "Top-tier yield for income-seekers.",
                "Retail and office rebound in major hubs.",
                "Exceptional footprint in Asian commercial hubs.",
                "www.mapletreepanasiacommercialtrust.com",
                "Retail sector headwinds.",
            ],
        ),
        stock(
            "ST Engineering",
            "S63",
            [74, 86, 85],
            3.6,
            Volatility::Low,
            [
                "Global leader in aircraft maintenance.",
                "Recession-resilient dividend history.",
                "Smart city and aerospace defense contracts.",
                "Stability play for conservative portfolios.",
                "www.stengg.com",
                "Defense budget cycles.",
            ],
        ),
        stock(
            "ComfortDelGro",
            "C52",
            [90, 82, 78],
            5.1,
            Volatility::Med,
            [
                "Running EV fleets across 7 countries.",
                "Consistent payouts supported by cash flow.",
                "Public transport electrification globally.",
                "Transportation sector leader in social metrics.",
                "www.comfortdelgro.com",
                "Government contract renewals.",
            ],
        ),
        stock(
            "Wilmar Intl.",
            "F34",
            [66, 74, 80],
            4.1,
            Volatility::High,
            [
                "World's largest palm oil processor.",
                "Dividend varies with commodity cycles.",
                "Expanding consumer food brands in China/India.",
                "Critical scale in global food security.",
                "www.wilmar-international.com",
                "Commodity price volatility.",
            ],
        ),
    ]
}

fn stock(
    name: &str,
    ticker: &str,
    [environmental, social, governance]: [u8; 3],
    dividend_yield: f64,
    volatility: Volatility,
    [highlight, dividend_note, growth_note, positioning_note, website, risk_note]: [&str; 6],
) -> StockRecord {
    StockRecord {
        name: name.to_string(),
        ticker: ticker.to_string(),
        environmental,
        social,
        governance,
        dividend_yield,
        volatility,
        highlight: highlight.to_string(),
        dividend_note: dividend_note.to_string(),
        growth_note: growth_note.to_string(),
        positioning_note: positioning_note.to_string(),
        website: website.to_string(),
        risk_note: risk_note.to_string(),
    }
}
