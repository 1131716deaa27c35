pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = '?';
pub(crate) const HELP_MESSAGE: &str = "Display this help.";

pub(crate) const WILDCARD: &str = "*";
pub(crate) const NEGATION_PREFIX: &str = "no-";
pub(crate) const END_OF_OPTIONS: &str = "--";

pub(crate) const PATH_META: &str = "path";
pub(crate) const FILENAME_META: &str = "filename";

// Literals the tokenizer accepts as an explicit value after a boolean flag.
pub(crate) const STRICT_TRUE: [&str; 4] = ["1", "true", "on", "yes"];
pub(crate) const STRICT_FALSE: [&str; 4] = ["0", "false", "off", "no"];

// Literals the validator coerces into a boolean.
pub(crate) const COERCE_TRUE: [&str; 4] = ["1", "true", "yes", "enabled"];
pub(crate) const COERCE_FALSE: [&str; 5] = ["", "0", "false", "no", "disabled"];
