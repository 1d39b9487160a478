// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static locale data tables.
//!
//! Views format dates, numbers, and plurals through a [`LocaleData`] record
//! looked up by locale id with [`find_locale`]. The tables are plain static
//! data derived from CLDR; widths the source leaves undefined are resolved
//! to the nearest narrower defined width when the table is written.

/// CLDR plural categories, in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plural {
    /// Index 0.
    Zero = 0,
    /// Index 1.
    One = 1,
    /// Index 2.
    Two = 2,
    /// Index 3.
    Few = 3,
    /// Index 4.
    Many = 4,
    /// Index 5.
    Other = 5,
}

impl Plural {
    /// Returns the plural-form index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Width of day, month, period, and era names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranslationWidth {
    /// 1-character form, e.g. `T`.
    Narrow,
    /// Abbreviated form, e.g. `Tue`.
    Abbreviated,
    /// Full form, e.g. `Tuesday`.
    Wide,
    /// Two-character form, e.g. `Tu`. Only days define it; months and eras
    /// fall back to [`Abbreviated`](Self::Abbreviated).
    Short,
}

/// Length of a date, time, or date-time pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatWidth {
    /// e.g. `6/15/15`.
    Short,
    /// e.g. `Jun 15, 2015`.
    Medium,
    /// e.g. `June 15, 2015`.
    Long,
    /// e.g. `Monday, June 15, 2015`.
    Full,
}

/// Number format patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberFormatStyle {
    /// Plain decimal.
    Decimal,
    /// Percentage.
    Percent,
    /// Currency amount.
    Currency,
    /// Scientific notation.
    Scientific,
}

/// Symbols used when formatting numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NumberSymbols {
    /// Decimal separator.
    pub decimal: &'static str,
    /// Grouping separator.
    pub group: &'static str,
    /// List separator.
    pub list: &'static str,
    /// Percent sign.
    pub percent_sign: &'static str,
    /// Plus sign.
    pub plus_sign: &'static str,
    /// Minus sign.
    pub minus_sign: &'static str,
    /// Exponent marker.
    pub exponential: &'static str,
    /// Multiplication sign in superscripted exponents.
    pub superscripting_exponent: &'static str,
    /// Per-mille sign.
    pub per_mille: &'static str,
    /// Infinity.
    pub infinity: &'static str,
    /// Not-a-number.
    pub nan: &'static str,
    /// Separator between hours and minutes.
    pub time_separator: &'static str,
}

/// Day names, Sunday first, per width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DayNames {
    /// Narrow names.
    pub narrow: [&'static str; 7],
    /// Abbreviated names.
    pub abbreviated: [&'static str; 7],
    /// Wide names.
    pub wide: [&'static str; 7],
    /// Short names.
    pub short: [&'static str; 7],
}

/// Month names, January first, per width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonthNames {
    /// Narrow names.
    pub narrow: [&'static str; 12],
    /// Abbreviated names.
    pub abbreviated: [&'static str; 12],
    /// Wide names.
    pub wide: [&'static str; 12],
}

/// Everything a view needs to format values for one locale.
#[derive(Clone, Copy, Debug)]
pub struct LocaleData {
    /// Normalized locale id, e.g. `ne`.
    pub id: &'static str,
    /// AM/PM names.
    pub day_periods: [&'static str; 2],
    /// Day names used inside dates.
    pub days: DayNames,
    /// Month names used inside dates.
    pub months: MonthNames,
    /// Month names used on their own.
    pub standalone_months: MonthNames,
    /// BC/AD names.
    pub eras: [&'static str; 2],
    /// First day of the week, 0 for Sunday.
    pub first_day_of_week: u8,
    /// First and last day of the weekend, 0 for Sunday.
    pub weekend_range: [u8; 2],
    /// Date patterns, short to full.
    pub date_formats: [&'static str; 4],
    /// Time patterns, short to full.
    pub time_formats: [&'static str; 4],
    /// Date-time glue patterns, short to full. `{1}` is the date, `{0}` the time.
    pub date_time_formats: [&'static str; 4],
    /// Number symbols.
    pub number_symbols: NumberSymbols,
    /// Number patterns: decimal, percent, currency, scientific.
    pub number_formats: [&'static str; 4],
    /// Symbol of the locale's own currency.
    pub currency_symbol: &'static str,
    /// Name of the locale's own currency.
    pub currency_name: &'static str,
    /// Locale-specific symbols for other currencies, by ISO code.
    pub currencies: &'static [(&'static str, &'static str)],
    /// Maps a count to its plural category.
    pub plural: fn(f64) -> Plural,
}

impl LocaleData {
    /// Returns day names at the given width.
    #[must_use]
    pub const fn day_names(&self, width: TranslationWidth) -> &[&'static str; 7] {
        match width {
            TranslationWidth::Narrow => &self.days.narrow,
            TranslationWidth::Abbreviated => &self.days.abbreviated,
            TranslationWidth::Wide => &self.days.wide,
            TranslationWidth::Short => &self.days.short,
        }
    }

    /// Returns month names at the given width.
    #[must_use]
    pub const fn month_names(&self, width: TranslationWidth, standalone: bool) -> &[&'static str; 12] {
        let months = if standalone {
            &self.standalone_months
        } else {
            &self.months
        };
        match width {
            TranslationWidth::Narrow => &months.narrow,
            TranslationWidth::Abbreviated | TranslationWidth::Short => &months.abbreviated,
            TranslationWidth::Wide => &months.wide,
        }
    }

    /// Returns the date pattern of the given width.
    #[must_use]
    pub const fn date_format(&self, width: FormatWidth) -> &'static str {
        self.date_formats[width_index(width)]
    }

    /// Returns the time pattern of the given width.
    #[must_use]
    pub const fn time_format(&self, width: FormatWidth) -> &'static str {
        self.time_formats[width_index(width)]
    }

    /// Returns the date-time glue pattern of the given width.
    #[must_use]
    pub const fn date_time_format(&self, width: FormatWidth) -> &'static str {
        self.date_time_formats[width_index(width)]
    }

    /// Returns the number pattern for the given style.
    #[must_use]
    pub const fn number_format(&self, style: NumberFormatStyle) -> &'static str {
        self.number_formats[match style {
            NumberFormatStyle::Decimal => 0,
            NumberFormatStyle::Percent => 1,
            NumberFormatStyle::Currency => 2,
            NumberFormatStyle::Scientific => 3,
        }]
    }

    /// Returns the locale's symbol for a foreign currency, if it has one.
    #[must_use]
    pub fn currency_symbol_for(&self, code: &str) -> Option<&'static str> {
        self.currencies
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, symbol)| *symbol)
    }

    /// Returns the plural category for `n`.
    #[must_use]
    pub fn plural(&self, n: f64) -> Plural {
        (self.plural)(n)
    }
}

const fn width_index(width: FormatWidth) -> usize {
    match width {
        FormatWidth::Short => 0,
        FormatWidth::Medium => 1,
        FormatWidth::Long => 2,
        FormatWidth::Full => 3,
    }
}

/// Looks up locale data by id.
///
/// The id is normalized (ASCII lower-case, `_` → `-`). The full id is tried
/// first, then its language part, so `ne_NP` finds `ne`.
#[must_use]
pub fn find_locale(id: &str) -> Option<&'static LocaleData> {
    let find = |candidate: &str| {
        LOCALES
            .iter()
            .copied()
            .find(|data| normalized_eq(candidate, data.id))
    };
    find(id).or_else(|| {
        let language = id.split(['-', '_']).next()?;
        find(language)
    })
}

/// Compares a raw locale id against a normalized one.
fn normalized_eq(raw: &str, normalized: &str) -> bool {
    raw.len() == normalized.len()
        && raw.bytes().zip(normalized.bytes()).all(|(r, n)| {
            let r = if r == b'_' { b'-' } else { r.to_ascii_lowercase() };
            r == n
        })
}

/// All built-in locales.
pub static LOCALES: &[&LocaleData] = &[&EN, &NE];

const LATIN_SYMBOLS: NumberSymbols = NumberSymbols {
    decimal: ".",
    group: ",",
    list: ";",
    percent_sign: "%",
    plus_sign: "+",
    minus_sign: "-",
    exponential: "E",
    superscripting_exponent: "×",
    per_mille: "‰",
    infinity: "∞",
    nan: "NaN",
    time_separator: ":",
};

fn plural_en(n: f64) -> Plural {
    // One only for an integer 1 without visible fraction digits.
    if n == 1.0 || n == -1.0 {
        Plural::One
    } else {
        Plural::Other
    }
}

fn plural_ne(n: f64) -> Plural {
    if n == 1.0 { Plural::One } else { Plural::Other }
}

/// English.
pub static EN: LocaleData = LocaleData {
    id: "en",
    day_periods: ["AM", "PM"],
    days: DayNames {
        narrow: ["S", "M", "T", "W", "T", "F", "S"],
        abbreviated: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        wide: [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ],
        short: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
    },
    months: EN_MONTHS,
    standalone_months: EN_MONTHS,
    eras: ["BC", "AD"],
    first_day_of_week: 0,
    weekend_range: [6, 0],
    date_formats: ["M/d/yy", "MMM d, y", "MMMM d, y", "EEEE, MMMM d, y"],
    time_formats: ["h:mm a", "h:mm:ss a", "h:mm:ss a z", "h:mm:ss a zzzz"],
    date_time_formats: ["{1}, {0}", "{1}, {0}", "{1} 'at' {0}", "{1} 'at' {0}"],
    number_symbols: LATIN_SYMBOLS,
    number_formats: ["#,##0.###", "#,##0%", "¤#,##0.00", "#E0"],
    currency_symbol: "$",
    currency_name: "US Dollar",
    currencies: &[],
    plural: plural_en,
};

const EN_MONTHS: MonthNames = MonthNames {
    narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    abbreviated: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    wide: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
};

/// Nepali.
pub static NE: LocaleData = LocaleData {
    id: "ne",
    day_periods: ["पूर्वाह्न", "अपराह्न"],
    days: DayNames {
        narrow: ["आ", "सो", "म", "बु", "बि", "शु", "श"],
        abbreviated: ["आइत", "सोम", "मङ्गल", "बुध", "बिहि", "शुक्र", "शनि"],
        wide: [
            "आइतबार",
            "सोमबार",
            "मङ्गलबार",
            "बुधबार",
            "बिहिबार",
            "शुक्रबार",
            "शनिबार",
        ],
        short: ["आइत", "सोम", "मङ्गल", "बुध", "बिहि", "शुक्र", "शनि"],
    },
    months: MonthNames {
        narrow: [
            "जन", "फेब", "मार्च", "अप्र", "मे", "जुन", "जुल", "अग", "सेप", "अक्टो", "नोभे", "डिसे",
        ],
        abbreviated: NE_MONTHS_WIDE,
        wide: NE_MONTHS_WIDE,
    },
    standalone_months: MonthNames {
        narrow: [
            "जन", "फेेब", "मार्च", "अप्र", "मे", "जुन", "जुल", "अग", "सेप", "अक्टो", "नोभे", "डिसे",
        ],
        abbreviated: NE_MONTHS_WIDE,
        wide: NE_MONTHS_WIDE,
    },
    eras: ["ईसा पूर्व", "सन्"],
    first_day_of_week: 0,
    weekend_range: [6, 0],
    date_formats: ["yy/M/d", "y MMM d", "y MMMM d", "y MMMM d, EEEE"],
    time_formats: ["HH:mm", "HH:mm:ss", "HH:mm:ss z", "HH:mm:ss zzzz"],
    date_time_formats: ["{1}, {0}", "{1}, {0}", "{1} {0}", "{1} {0}"],
    number_symbols: LATIN_SYMBOLS,
    number_formats: ["#,##0.###", "#,##0%", "¤ #,##0.00", "#E0"],
    currency_symbol: "नेरू",
    currency_name: "नेपाली रूपैयाँ",
    currencies: &[("JPY", "JP¥"), ("NPR", "नेरू"), ("THB", "฿"), ("USD", "US$")],
    plural: plural_ne,
};

const NE_MONTHS_WIDE: [&str; 12] = [
    "जनवरी",
    "फेब्रुअरी",
    "मार्च",
    "अप्रिल",
    "मे",
    "जुन",
    "जुलाई",
    "अगस्ट",
    "सेप्टेम्बर",
    "अक्टोबर",
    "नोभेम्बर",
    "डिसेम्बर",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_locale_normalizes_ids() {
        assert_eq!(find_locale("ne").map(|l| l.id), Some("ne"));
        assert_eq!(find_locale("NE").map(|l| l.id), Some("ne"));
        assert_eq!(find_locale("ne_NP").map(|l| l.id), Some("ne"));
        assert_eq!(find_locale("en-US").map(|l| l.id), Some("en"));
        assert!(find_locale("xx").is_none());
        assert!(find_locale("").is_none());
    }

    #[test]
    fn nepali_plural_rule() {
        let ne = find_locale("ne").unwrap();
        assert_eq!(ne.plural(1.0), Plural::One);
        assert_eq!(ne.plural(0.0), Plural::Other);
        assert_eq!(ne.plural(2.0), Plural::Other);
        assert_eq!(ne.plural(1.5), Plural::Other);
        assert_eq!(Plural::Other.index(), 5);
    }

    #[test]
    fn english_plural_rule() {
        assert_eq!(EN.plural(1.0), Plural::One);
        assert_eq!(EN.plural(-1.0), Plural::One);
        assert_eq!(EN.plural(1.5), Plural::Other);
        assert_eq!(EN.plural(0.0), Plural::Other);
    }

    #[test]
    fn nepali_formats() {
        assert_eq!(NE.date_format(FormatWidth::Short), "yy/M/d");
        assert_eq!(NE.time_format(FormatWidth::Full), "HH:mm:ss zzzz");
        assert_eq!(NE.date_time_format(FormatWidth::Medium), "{1}, {0}");
        assert_eq!(NE.date_time_format(FormatWidth::Full), "{1} {0}");
        assert_eq!(NE.number_format(NumberFormatStyle::Currency), "¤ #,##0.00");
        assert_eq!(NE.currency_symbol_for("USD"), Some("US$"));
        assert_eq!(NE.currency_symbol_for("EUR"), None);
    }

    #[test]
    fn names_by_width() {
        assert_eq!(EN.day_names(TranslationWidth::Short)[2], "Tu");
        assert_eq!(EN.month_names(TranslationWidth::Wide, false)[5], "June");
        assert_eq!(
            EN.month_names(TranslationWidth::Short, false),
            EN.month_names(TranslationWidth::Abbreviated, false)
        );
        assert_ne!(
            NE.month_names(TranslationWidth::Narrow, true)[1],
            NE.month_names(TranslationWidth::Narrow, false)[1]
        );
    }
}
