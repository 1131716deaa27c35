mod model;
mod tokenizer;

pub(crate) use tokenizer::Tokenizer;
