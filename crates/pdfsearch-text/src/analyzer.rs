use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

pub const STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
];

/// Token pipeline shared by indexing and querying: split on non-alphanumerics,
/// lowercase, and optionally drop English stop words.
#[derive(Clone)]
pub struct Analyzer {
	inner: TextAnalyzer,
}

impl Analyzer {
	pub fn new(remove_stopwords: bool) -> Self {
		let inner = if remove_stopwords {
			TextAnalyzer::builder(SimpleTokenizer::default())
				.filter(LowerCaser)
				.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string())))
				.build()
		} else {
			TextAnalyzer::builder(SimpleTokenizer::default()).filter(LowerCaser).build()
		};
		Self { inner }
	}

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		let mut analyzer = self.inner.clone();
		tokenize_with(&mut analyzer, text)
	}

	/// Reusable tokenizer handle for bulk work; `TextAnalyzer` streams need `&mut`.
	pub(crate) fn handle(&self) -> TextAnalyzer {
		self.inner.clone()
	}
}

impl Default for Analyzer {
	fn default() -> Self {
		Self::new(true)
	}
}

pub(crate) fn tokenize_with(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
	let mut stream = analyzer.token_stream(text);
	let mut tokens = Vec::new();
	while stream.advance() {
		tokens.push(stream.token().text.clone());
	}
	tokens
}
