use crate::swap::CHUNK_SIZE;
use std::env;
use std::ffi::OsString;

#[derive(Clone, Debug)]
pub struct Config {
    /// Bytes per read/permute/write step, a non-zero multiple of 4.
    pub chunk_size: usize,
}

impl Config {
    /// Entries that aren't valid UTF-8 are skipped.
    pub fn from_vars<I>(vars: I) -> Config
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let base = Config {
            chunk_size: CHUNK_SIZE,
        };

        vars.into_iter().fold(base, |mut base, (k, v)| {
            match (k.to_str(), v.to_str().map(str::parse::<usize>)) {
                (Some("REALITY_CHUNK_SIZE"), Some(Ok(size))) if size != 0 && size % 4 == 0 => {
                    base.chunk_size = size
                }
                _ => {}
            }

            base
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_vars(env::vars_os())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs
            .iter()
            .map(|&(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    #[test]
    fn default_chunk_size() {
        assert_eq!(Config::from_vars(vars(&[("HOME", "/root")])).chunk_size, 1024);
    }

    #[test]
    fn chunk_size_from_env() {
        assert_eq!(
            Config::from_vars(vars(&[("REALITY_CHUNK_SIZE", "65536")])).chunk_size,
            65536
        );
    }

    #[test]
    fn ignore_bad_chunk_size() {
        for bad in &["0", "1022", "lots", "-4"] {
            assert_eq!(
                Config::from_vars(vars(&[("REALITY_CHUNK_SIZE", *bad)])).chunk_size,
                CHUNK_SIZE
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn skip_non_utf8_vars() {
        use std::os::unix::ffi::OsStringExt;

        let mut env = vars(&[("REALITY_CHUNK_SIZE", "2048")]);
        env.insert(0, (OsString::from("JUNK"), OsString::from_vec(vec![0xFF, 0xFE])));
        env.push((OsString::from_vec(vec![0xC0]), OsString::from("4096")));

        assert_eq!(Config::from_vars(env).chunk_size, 2048);
    }

    #[cfg(unix)]
    #[test]
    fn default_survives_non_utf8_env() {
        use std::os::unix::ffi::OsStrExt;

        env::set_var(
            "REALITY_CONFIG_TEST_JUNK",
            std::ffi::OsStr::from_bytes(&[0xFF, 0xFE]),
        );

        let config = Config::default();
        env::remove_var("REALITY_CONFIG_TEST_JUNK");

        assert_eq!(config.chunk_size % 4, 0);
    }
}
