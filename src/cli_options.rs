use std::collections::HashMap;

pub struct CliOptions {
    pub use_multi_thread: bool,
    pub model_file: Option<String>,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            use_multi_thread: true,
            model_file: None,
            help: false,
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"
        --model <file.json>
        --use_multi_thread | --use_single_thread
        --help
        "#
    }
}

pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            Some(value) if !value.starts_with('-') => {
                let value = args.pop();
                pairs.insert(key, value);
            }
            _ => {
                pairs.insert(key, None);
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        match k.as_str() {
            "--use_multi_thread" => options.use_multi_thread = true,
            "--use_single_thread" => options.use_multi_thread = false,
            "--model" => match v {
                Some(path) => options.model_file = Some(path),
                None => return Err("--model needs a file name".to_string()),
            },
            "--help" => options.help = true,
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pointkernel")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn model_and_threading() {
        let options = parse_args(args(&["--use_single_thread", "--model", "shielded.json"])).unwrap();
        assert!(!options.use_multi_thread);
        assert_eq!(options.model_file.as_deref(), Some("shielded.json"));
        assert!(!options.help);

        let options = parse_args(args(&[])).unwrap();
        assert!(options.use_multi_thread);
        assert!(options.model_file.is_none());
    }

    #[test]
    fn bad_arguments() {
        assert!(parse_args(args(&["model.json"])).is_err());
        assert!(parse_args(args(&["--model"])).is_err());
        assert!(parse_args(args(&["--model", "--help"])).is_err());
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        assert!(parse_args(args(&["--help"])).unwrap().help);
    }
}
