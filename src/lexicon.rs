//! Static pronunciation data for the rule-based G2P.
//!
//! Three tables, consulted in this order by [`crate::phonemize::RuleG2p`]:
//!
//! 1. [`EXCEPTIONS`]: whole words whose spelling the rules get wrong, plus
//!    the function words that make up most of any sentence.
//! 2. [`SUFFIX_RULES`]: productive English endings with a fixed phoneme tail.
//! 3. Letter rules: vowel clusters, consonant clusters and single consonants,
//!    each matched longest-first at the current position.
//!
//! Phonemes are ARPAbet without stress digits.  Contractions appear in their
//! apostrophe-free form because the segmenter removes apostrophes.

/// Whole-word pronunciations, space-separated ARPAbet.
pub static EXCEPTIONS: &[(&str, &str)] = &[
    // ── articles, conjunctions, prepositions ─────────────────────────────────
    ("a", "AH"),
    ("an", "AE N"),
    ("the", "DH AH"),
    ("and", "AE N D"),
    ("or", "AO R"),
    ("but", "B AH T"),
    ("if", "IH F"),
    ("of", "AH V"),
    ("to", "T UW"),
    ("too", "T UW"),
    ("in", "IH N"),
    ("on", "AA N"),
    ("at", "AE T"),
    ("by", "B AY"),
    ("for", "F AO R"),
    ("from", "F R AH M"),
    ("with", "W IH DH"),
    ("without", "W IH TH AW T"),
    ("about", "AH B AW T"),
    ("as", "AE Z"),
    ("into", "IH N T UW"),
    ("onto", "AA N T UW"),
    ("upon", "AH P AA N"),
    ("over", "OW V ER"),
    ("under", "AH N D ER"),
    ("after", "AE F T ER"),
    ("before", "B IH F AO R"),
    ("because", "B IH K AO Z"),
    ("between", "B IH T W IY N"),
    ("around", "ER AW N D"),
    ("across", "AH K R AO S"),
    ("along", "AH L AO NG"),
    ("among", "AH M AH NG"),
    ("behind", "B IH HH AY N D"),
    ("beyond", "B IH AA N D"),
    ("during", "D UH R IH NG"),
    ("until", "AH N T IH L"),
    ("while", "W AY L"),
    ("whether", "W EH DH ER"),
    ("though", "DH OW"),
    ("although", "AO L DH OW"),
    ("through", "TH R UW"),
    ("than", "DH AE N"),
    ("then", "DH EH N"),
    ("so", "S OW"),
    ("against", "AH G EH N S T"),
    ("together", "T AH G EH DH ER"),
    ("however", "HH AW EH V ER"),
    // ── pronouns and determiners ──────────────────────────────────────────────
    ("i", "AY"),
    ("me", "M IY"),
    ("my", "M AY"),
    ("mine", "M AY N"),
    ("myself", "M AY S EH L F"),
    ("you", "Y UW"),
    ("your", "Y AO R"),
    ("yours", "Y AO R Z"),
    ("yourself", "Y AO R S EH L F"),
    ("he", "HH IY"),
    ("him", "HH IH M"),
    ("his", "HH IH Z"),
    ("she", "SH IY"),
    ("her", "HH ER"),
    ("hers", "HH ER Z"),
    ("it", "IH T"),
    ("its", "IH T S"),
    ("we", "W IY"),
    ("us", "AH S"),
    ("our", "AW ER"),
    ("ours", "AW ER Z"),
    ("they", "DH EY"),
    ("them", "DH EH M"),
    ("their", "DH EH R"),
    ("theirs", "DH EH R Z"),
    ("this", "DH IH S"),
    ("that", "DH AE T"),
    ("these", "DH IY Z"),
    ("those", "DH OW Z"),
    ("there", "DH EH R"),
    ("here", "HH IY R"),
    ("where", "W EH R"),
    ("what", "W AH T"),
    ("when", "W EH N"),
    ("why", "W AY"),
    ("who", "HH UW"),
    ("whom", "HH UW M"),
    ("whose", "HH UW Z"),
    ("which", "W IH CH"),
    ("how", "HH AW"),
    ("all", "AO L"),
    ("any", "EH N IY"),
    ("many", "M EH N IY"),
    ("some", "S AH M"),
    ("none", "N AH N"),
    ("other", "AH DH ER"),
    ("another", "AH N AH DH ER"),
    ("each", "IY CH"),
    ("every", "EH V R IY"),
    ("everything", "EH V R IY TH IH NG"),
    ("everyone", "EH V R IY W AH N"),
    ("everybody", "EH V R IY B AA D IY"),
    ("nothing", "N AH TH IH NG"),
    ("something", "S AH M TH IH NG"),
    ("anything", "EH N IY TH IH NG"),
    ("someone", "S AH M W AH N"),
    ("own", "OW N"),
    ("same", "S EY M"),
    ("such", "S AH CH"),
    // ── auxiliaries and modals ────────────────────────────────────────────────
    ("is", "IH Z"),
    ("was", "W AA Z"),
    ("were", "W ER"),
    ("are", "AA R"),
    ("be", "B IY"),
    ("been", "B IH N"),
    ("being", "B IY IH NG"),
    ("am", "AE M"),
    ("do", "D UW"),
    ("does", "D AH Z"),
    ("did", "D IH D"),
    ("done", "D AH N"),
    ("doing", "D UW IH NG"),
    ("have", "HH AE V"),
    ("has", "HH AE Z"),
    ("had", "HH AE D"),
    ("having", "HH AE V IH NG"),
    ("could", "K UH D"),
    ("would", "W UH D"),
    ("should", "SH UH D"),
    ("can", "K AE N"),
    ("will", "W IH L"),
    ("shall", "SH AE L"),
    ("may", "M EY"),
    ("might", "M AY T"),
    ("must", "M AH S T"),
    // ── contractions (apostrophes already removed) ────────────────────────────
    ("dont", "D OW N T"),
    ("doesnt", "D AH Z AH N T"),
    ("didnt", "D IH D AH N T"),
    ("cant", "K AE N T"),
    ("wont", "W OW N T"),
    ("isnt", "IH Z AH N T"),
    ("arent", "AA R AH N T"),
    ("wasnt", "W AA Z AH N T"),
    ("werent", "W ER AH N T"),
    ("wouldnt", "W UH D AH N T"),
    ("couldnt", "K UH D AH N T"),
    ("shouldnt", "SH UH D AH N T"),
    ("havent", "HH AE V AH N T"),
    ("hasnt", "HH AE Z AH N T"),
    ("im", "AY M"),
    ("ive", "AY V"),
    ("youre", "Y UH R"),
    ("youve", "Y UW V"),
    ("youll", "Y UW L"),
    ("youd", "Y UW D"),
    ("hes", "HH IY Z"),
    ("shes", "SH IY Z"),
    ("weve", "W IY V"),
    ("theyre", "DH EH R"),
    ("theyve", "DH EY V"),
    ("theyll", "DH EY L"),
    ("thats", "DH AE T S"),
    ("whats", "W AH T S"),
    ("theres", "DH EH R Z"),
    ("heres", "HH IY R Z"),
    ("lets", "L EH T S"),
    // ── adverbs and particles ─────────────────────────────────────────────────
    ("no", "N OW"),
    ("not", "N AA T"),
    ("yes", "Y EH S"),
    ("very", "V EH R IY"),
    ("more", "M AO R"),
    ("most", "M OW S T"),
    ("much", "M AH CH"),
    ("just", "JH AH S T"),
    ("also", "AO L S OW"),
    ("again", "AH G EH N"),
    ("always", "AO L W EY Z"),
    ("never", "N EH V ER"),
    ("ever", "EH V ER"),
    ("often", "AO F AH N"),
    ("still", "S T IH L"),
    ("even", "IY V AH N"),
    ("once", "W AH N S"),
    ("only", "OW N L IY"),
    ("maybe", "M EY B IY"),
    ("probably", "P R AA B AH B L IY"),
    ("actually", "AE K CH UW AH L IY"),
    ("really", "R IY L IY"),
    ("quite", "K W AY T"),
    ("ago", "AH G OW"),
    ("enough", "IH N AH F"),
    // ── greetings and conversation ────────────────────────────────────────────
    ("hello", "HH AH L OW"),
    ("hi", "HH AY"),
    ("hey", "HH EY"),
    ("goodbye", "G UH D B AY"),
    ("bye", "B AY"),
    ("thanks", "TH AE NG K S"),
    ("thank", "TH AE NG K"),
    ("please", "P L IY Z"),
    ("sorry", "S AA R IY"),
    ("okay", "OW K EY"),
    ("ok", "OW K EY"),
    ("good", "G UH D"),
    ("great", "G R EY T"),
    ("well", "W EH L"),
    ("fine", "F AY N"),
    ("nice", "N AY S"),
    ("welcome", "W EH L K AH M"),
    // ── numbers as spelled by the normaliser ──────────────────────────────────
    ("zero", "Z IH R OW"),
    ("one", "W AH N"),
    ("two", "T UW"),
    ("three", "TH R IY"),
    ("four", "F AO R"),
    ("five", "F AY V"),
    ("six", "S IH K S"),
    ("seven", "S EH V AH N"),
    ("eight", "EY T"),
    ("nine", "N AY N"),
    ("ten", "T EH N"),
    ("eleven", "IH L EH V AH N"),
    ("twelve", "T W EH L V"),
    ("twenty", "T W EH N T IY"),
    ("thirty", "TH ER T IY"),
    ("forty", "F AO R T IY"),
    ("fifty", "F IH F T IY"),
    ("hundred", "HH AH N D R AH D"),
    ("thousand", "TH AW Z AH N D"),
    ("million", "M IH L Y AH N"),
    ("billion", "B IH L Y AH N"),
    ("point", "P OY N T"),
    ("percent", "P ER S EH N T"),
    ("dollar", "D AA L ER"),
    ("dollars", "D AA L ER Z"),
    ("cents", "S EH N T S"),
    ("euros", "Y UH R OW Z"),
    ("pounds", "P AW N D Z"),
    ("first", "F ER S T"),
    ("second", "S EH K AH N D"),
    ("third", "TH ER D"),
    ("minus", "M AY N AH S"),
    // ── common verbs ──────────────────────────────────────────────────────────
    ("said", "S EH D"),
    ("says", "S EH Z"),
    ("say", "S EY"),
    ("go", "G OW"),
    ("goes", "G OW Z"),
    ("going", "G OW IH NG"),
    ("gone", "G AO N"),
    ("come", "K AH M"),
    ("comes", "K AH M Z"),
    ("coming", "K AH M IH NG"),
    ("came", "K EY M"),
    ("know", "N OW"),
    ("knew", "N UW"),
    ("known", "N OW N"),
    ("think", "TH IH NG K"),
    ("thought", "TH AO T"),
    ("make", "M EY K"),
    ("made", "M EY D"),
    ("take", "T EY K"),
    ("like", "L AY K"),
    ("see", "S IY"),
    ("look", "L UH K"),
    ("took", "T UH K"),
    ("want", "W AA N T"),
    ("need", "N IY D"),
    ("feel", "F IY L"),
    ("help", "HH EH L P"),
    ("tell", "T EH L"),
    ("ask", "AE S K"),
    ("use", "Y UW Z"),
    ("find", "F AY N D"),
    ("give", "G IH V"),
    ("get", "G EH T"),
    ("live", "L IH V"),
    ("love", "L AH V"),
    ("move", "M UW V"),
    ("prove", "P R UW V"),
    ("lose", "L UW Z"),
    ("choose", "CH UW Z"),
    ("put", "P UH T"),
    ("push", "P UH SH"),
    ("pull", "P UH L"),
    ("walk", "W AO K"),
    ("talk", "T AO K"),
    ("listen", "L IH S AH N"),
    ("learn", "L ER N"),
    ("read", "R IY D"),
    ("write", "R AY T"),
    ("speak", "S P IY K"),
    ("begin", "B IH G IH N"),
    ("guess", "G EH S"),
    ("build", "B IH L D"),
    ("remember", "R IH M EH M B ER"),
    ("understand", "AH N D ER S T AE N D"),
    ("open", "OW P AH N"),
    ("break", "B R EY K"),
    ("work", "W ER K"),
    ("laugh", "L AE F"),
    ("answer", "AE N S ER"),
    // ── common nouns and adjectives ───────────────────────────────────────────
    ("world", "W ER L D"),
    ("word", "W ER D"),
    ("words", "W ER D Z"),
    ("people", "P IY P AH L"),
    ("person", "P ER S AH N"),
    ("friend", "F R EH N D"),
    ("friends", "F R EH N D Z"),
    ("woman", "W UH M AH N"),
    ("women", "W IH M AH N"),
    ("man", "M AE N"),
    ("men", "M EH N"),
    ("child", "CH AY L D"),
    ("children", "CH IH L D R AH N"),
    ("eye", "AY"),
    ("eyes", "AY Z"),
    ("water", "W AO T ER"),
    ("time", "T AY M"),
    ("day", "D EY"),
    ("today", "T AH D EY"),
    ("tomorrow", "T AH M AA R OW"),
    ("yesterday", "Y EH S T ER D EY"),
    ("night", "N AY T"),
    ("morning", "M AO R N IH NG"),
    ("evening", "IY V N IH NG"),
    ("home", "HH OW M"),
    ("house", "HH AW S"),
    ("life", "L AY F"),
    ("place", "P L EY S"),
    ("name", "N EY M"),
    ("right", "R AY T"),
    ("light", "L AY T"),
    ("wrong", "R AO NG"),
    ("long", "L AO NG"),
    ("young", "Y AH NG"),
    ("new", "N UW"),
    ("old", "OW L D"),
    ("big", "B IH G"),
    ("small", "S M AO L"),
    ("little", "L IH T AH L"),
    ("last", "L AE S T"),
    ("next", "N EH K S T"),
    ("few", "F Y UW"),
    ("happy", "HH AE P IY"),
    ("kind", "K AY N D"),
    ("mind", "M AY N D"),
    ("book", "B UH K"),
    ("foot", "F UH T"),
    ("full", "F UH L"),
    ("blood", "B L AH D"),
    ("door", "D AO R"),
    ("floor", "F L AO R"),
    ("hour", "AW ER"),
    ("sure", "SH UH R"),
    ("sugar", "SH UH G ER"),
    ("island", "AY L AH N D"),
    ("half", "HH AE F"),
    ("calm", "K AA M"),
    ("busy", "B IH Z IY"),
    ("business", "B IH Z N AH S"),
    ("minute", "M IH N AH T"),
    ("music", "M Y UW Z IH K"),
    ("computer", "K AH M P Y UW T ER"),
    ("science", "S AY AH N S"),
    ("technology", "T EH K N AA L AH JH IY"),
    ("beautiful", "B Y UW T AH F AH L"),
    ("idea", "AY D IY AH"),
    ("area", "EH R IY AH"),
    ("ready", "R EH D IY"),
    ("head", "HH EH D"),
    ("bread", "B R EH D"),
    ("dead", "D EH D"),
    ("heart", "HH AA R T"),
    ("early", "ER L IY"),
    ("earth", "ER TH"),
    ("year", "Y IH R"),
    ("heard", "HH ER D"),
    ("bear", "B EH R"),
    ("wear", "W EH R"),
    ("machine", "M AH SH IY N"),
    ("police", "P AH L IY S"),
    ("ocean", "OW SH AH N"),
    ("special", "S P EH SH AH L"),
    ("usual", "Y UW ZH UW AH L"),
    ("television", "T EH L AH V IH ZH AH N"),
    ("question", "K W EH S CH AH N"),
    ("nature", "N EY CH ER"),
    ("picture", "P IH K CH ER"),
    ("future", "F Y UW CH ER"),
    ("school", "S K UW L"),
    ("schedule", "S K EH JH UW L"),
    ("character", "K EH R IH K T ER"),
    ("christmas", "K R IH S M AH S"),
    ("psychology", "S AY K AA L AH JH IY"),
    ("honest", "AA N AH S T"),
    ("honor", "AA N ER"),
    ("colonel", "K ER N AH L"),
    ("knowledge", "N AA L IH JH"),
    ("example", "IH G Z AE M P AH L"),
    ("system", "S IH S T AH M"),
    ("language", "L AE NG G W AH JH"),
    ("english", "IH NG G L IH SH"),
    ("quiet", "K W AY AH T"),
    ("queue", "K Y UW"),
    ("true", "T R UW"),
    ("blue", "B L UW"),
    ("juice", "JH UW S"),
    ("fruit", "F R UW T"),
    ("guide", "G AY D"),
    ("guitar", "G IH T AA R"),
    ("girl", "G ER L"),
    ("tough", "T AH F"),
    ("rough", "R AH F"),
    ("cough", "K AO F"),
    ("voice", "V OY S"),
    ("speech", "S P IY CH"),
    ("text", "T EH K S T"),
    ("face", "F EY S"),
    ("mouth", "M AW TH"),
    ("smile", "S M AY L"),
    ("avatar", "AE V AH T AA R"),
    ("animation", "AE N AH M EY SH AH N"),
    ("neutral", "N UW T R AH L"),
];

/// A productive ending: strip `suffix`, pronounce the stem, append `tail`.
#[derive(Debug, Clone, Copy)]
pub struct SuffixRule {
    pub suffix: &'static str,
    pub tail: &'static [&'static str],
    /// Shortest stem (in bytes) the rule may leave behind.
    pub min_stem: usize,
    /// The rule does not apply when the stem ends in one of these letters.
    pub not_after: &'static str,
}

const fn suffix(
    suffix: &'static str,
    tail: &'static [&'static str],
    min_stem: usize,
    not_after: &'static str,
) -> SuffixRule {
    SuffixRule { suffix, tail, min_stem, not_after }
}

/// Ordered suffix rules, first match wins.
pub static SUFFIX_RULES: &[SuffixRule] = &[
    suffix("tion", &["SH", "AH", "N"], 2, ""),
    suffix("sion", &["ZH", "AH", "N"], 2, ""),
    suffix("ness", &["N", "AH", "S"], 3, ""),
    suffix("ment", &["M", "AH", "N", "T"], 3, ""),
    suffix("able", &["AH", "B", "AH", "L"], 3, ""),
    suffix("ible", &["AH", "B", "AH", "L"], 3, ""),
    suffix("less", &["L", "AH", "S"], 3, ""),
    suffix("ful", &["F", "AH", "L"], 3, ""),
    suffix("ous", &["AH", "S"], 3, ""),
    suffix("ing", &["IH", "NG"], 2, ""),
    suffix("ly", &["L", "IY"], 3, ""),
    suffix("est", &["AH", "S", "T"], 3, ""),
    suffix("ers", &["ER", "Z"], 3, ""),
    suffix("er", &["ER"], 3, ""),
    suffix("ed", &["D"], 3, ""),
    suffix("s", &["Z"], 3, "isu"),
];

/// Positional constraint on a letter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Anywhere,
    /// Only at the first letter of the word.
    Start,
    /// Only when the match ends the word.
    End,
    /// Anywhere except the first letter.
    NotStart,
    /// Only when the next letter is `e`, `i` or `y` (soft c).
    BeforeFrontVowel,
    /// Only when followed by exactly one consonant and a final `e` (make, time).
    MagicE,
}

/// One grapheme pattern and the phonemes it produces.
#[derive(Debug, Clone, Copy)]
pub struct LetterRule {
    pub pattern: &'static str,
    pub phonemes: &'static [&'static str],
    pub anchor: Anchor,
}

const fn rule(pattern: &'static str, phonemes: &'static [&'static str]) -> LetterRule {
    LetterRule { pattern, phonemes, anchor: Anchor::Anywhere }
}

const fn anchored(
    pattern: &'static str,
    phonemes: &'static [&'static str],
    anchor: Anchor,
) -> LetterRule {
    LetterRule { pattern, phonemes, anchor }
}

/// Vowel clusters, including single vowels.  Within one length, earlier
/// entries win, so anchored variants precede their unanchored fallback.
pub static VOWEL_CLUSTERS: &[LetterRule] = &[
    rule("augh", &["AO"]),
    rule("eigh", &["EY"]),
    rule("ough", &["AO"]),
    rule("tion", &["SH", "AH", "N"]),
    rule("sion", &["ZH", "AH", "N"]),
    rule("igh", &["AY"]),
    rule("eau", &["OW"]),
    rule("ear", &["IH", "R"]),
    rule("air", &["EH", "R"]),
    rule("our", &["AW", "ER"]),
    rule("oor", &["AO", "R"]),
    anchored("are", &["EH", "R"], Anchor::End),
    anchored("ore", &["AO", "R"], Anchor::End),
    anchored("ire", &["AY", "ER"], Anchor::End),
    anchored("ure", &["Y", "UH", "R"], Anchor::End),
    rule("oo", &["UW"]),
    rule("ee", &["IY"]),
    rule("ea", &["IY"]),
    rule("ai", &["EY"]),
    rule("ay", &["EY"]),
    rule("oa", &["OW"]),
    anchored("oe", &["OW"], Anchor::End),
    rule("oi", &["OY"]),
    rule("oy", &["OY"]),
    rule("ou", &["AW"]),
    anchored("ow", &["OW"], Anchor::End),
    rule("ow", &["AW"]),
    rule("au", &["AO"]),
    rule("aw", &["AO"]),
    rule("ie", &["IY"]),
    rule("ei", &["EY"]),
    rule("ue", &["UW"]),
    rule("ew", &["UW"]),
    anchored("ey", &["IY"], Anchor::End),
    rule("ar", &["AA", "R"]),
    rule("er", &["ER"]),
    rule("ir", &["ER"]),
    rule("ur", &["ER"]),
    rule("or", &["AO", "R"]),
    anchored("a", &["EY"], Anchor::MagicE),
    anchored("e", &["IY"], Anchor::MagicE),
    anchored("i", &["AY"], Anchor::MagicE),
    anchored("o", &["OW"], Anchor::MagicE),
    anchored("u", &["UW"], Anchor::MagicE),
    anchored("e", &[], Anchor::End),
    anchored("y", &["IY"], Anchor::End),
    anchored("y", &["IH"], Anchor::NotStart),
    rule("a", &["AE"]),
    rule("e", &["EH"]),
    rule("i", &["IH"]),
    rule("o", &["AA"]),
    rule("u", &["AH"]),
];

/// Multi-letter consonant clusters.
pub static CONSONANT_CLUSTERS: &[LetterRule] = &[
    rule("tch", &["CH"]),
    rule("sch", &["S", "K"]),
    rule("thr", &["TH", "R"]),
    rule("dge", &["JH"]),
    rule("ph", &["F"]),
    rule("sh", &["SH"]),
    rule("ch", &["CH"]),
    rule("th", &["TH"]),
    rule("wh", &["W"]),
    rule("ck", &["K"]),
    rule("ng", &["NG"]),
    rule("nk", &["NG", "K"]),
    rule("qu", &["K", "W"]),
    anchored("kn", &["N"], Anchor::Start),
    anchored("wr", &["R"], Anchor::Start),
    anchored("gn", &["N"], Anchor::Start),
    anchored("ps", &["S"], Anchor::Start),
    anchored("gh", &["G"], Anchor::Start),
    anchored("mb", &["M"], Anchor::End),
    anchored("ge", &["JH"], Anchor::End),
    rule("gh", &[]),
    rule("ss", &["S"]),
    rule("ll", &["L"]),
    rule("ff", &["F"]),
    rule("zz", &["Z"]),
    rule("tt", &["T"]),
    rule("pp", &["P"]),
    rule("bb", &["B"]),
    rule("dd", &["D"]),
    rule("mm", &["M"]),
    rule("nn", &["N"]),
    rule("rr", &["R"]),
    rule("cc", &["K"]),
    rule("gg", &["G"]),
];

/// Single consonant letters.
pub static SINGLE_CONSONANTS: &[LetterRule] = &[
    rule("b", &["B"]),
    anchored("c", &["S"], Anchor::BeforeFrontVowel),
    rule("c", &["K"]),
    rule("d", &["D"]),
    rule("f", &["F"]),
    rule("g", &["G"]),
    rule("h", &["HH"]),
    rule("j", &["JH"]),
    rule("k", &["K"]),
    rule("l", &["L"]),
    rule("m", &["M"]),
    rule("n", &["N"]),
    rule("p", &["P"]),
    rule("q", &["K"]),
    rule("r", &["R"]),
    rule("s", &["S"]),
    rule("t", &["T"]),
    rule("v", &["V"]),
    rule("w", &["W"]),
    anchored("x", &["Z"], Anchor::Start),
    rule("x", &["K", "S"]),
    anchored("y", &["Y"], Anchor::Start),
    rule("z", &["Z"]),
];

/// Per-character table used only when the letter rules produce nothing.
pub fn fallback_letter(c: char) -> &'static [&'static str] {
    match c {
        'a' | 'à' | 'â' => &["AE"],
        'á' | 'ä' => &["AA"],
        'e' | 'è' | 'ê' | 'ë' => &["EH"],
        'é' => &["EY"],
        'i' | 'í' | 'ì' | 'î' | 'ï' | 'y' => &["IY"],
        'o' | 'ó' | 'ò' | 'ô' | 'ö' => &["OW"],
        'u' | 'ú' | 'ù' | 'û' | 'ü' => &["UW"],
        'ñ' => &["N", "Y"],
        'ç' => &["S"],
        'b' => &["B"],
        'c' | 'k' | 'q' => &["K"],
        'd' => &["D"],
        'f' => &["F"],
        'g' => &["G"],
        'h' => &["HH"],
        'j' => &["JH"],
        'l' => &["L"],
        'm' => &["M"],
        'n' => &["N"],
        'p' => &["P"],
        'r' => &["R"],
        's' => &["S"],
        't' => &["T"],
        'v' => &["V"],
        'w' => &["W"],
        'x' => &["K", "S"],
        'z' => &["Z"],
        _ => &[FALLBACK_DEFAULT],
    }
}

/// Phoneme emitted for a letter no table knows.
pub const FALLBACK_DEFAULT: &str = "AH";
