//! Print the stored form of a password for the `devdojo_user.password`
//! column.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin hash-password -- devdojo
//! ```
//!
//! Without an argument the password is read from the first line of stdin.

use std::env;
use std::io::{self, BufRead};

use anime_backend::domain::PasswordHash;
use color_eyre::eyre::{Result, eyre};
use zeroize::Zeroizing;

fn main() -> Result<()> {
    color_eyre::install()?;
    let password = read_password(env::args().skip(1), io::stdin().lock())?;
    println!("{}", PasswordHash::generate(&password)?);
    Ok(())
}

fn read_password(
    mut args: impl Iterator<Item = String>,
    mut stdin: impl BufRead,
) -> Result<Zeroizing<String>> {
    let password = match args.next() {
        Some(arg) => Zeroizing::new(arg),
        None => {
            let mut line = Zeroizing::new(String::new());
            stdin.read_line(&mut line)?;
            Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned())
        }
    };
    if let Some(extra) = args.next() {
        return Err(eyre!("unexpected extra argument: {extra}"));
    }
    if password.is_empty() {
        return Err(eyre!("password must not be empty"));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn argument_takes_precedence_over_stdin() {
        let password = read_password(["devdojo".to_owned()].into_iter(), "ignored\n".as_bytes())
            .expect("password");
        assert_eq!(password.as_str(), "devdojo");
    }

    #[rstest]
    #[case("devdojo\n")]
    #[case("devdojo\r\n")]
    #[case("devdojo")]
    fn stdin_line_ending_is_stripped(#[case] input: &str) {
        let password = read_password(std::iter::empty(), input.as_bytes()).expect("password");
        assert_eq!(password.as_str(), "devdojo");
    }

    #[rstest]
    fn empty_password_is_rejected() {
        assert!(read_password(std::iter::empty(), "\n".as_bytes()).is_err());
    }

    #[rstest]
    fn extra_arguments_are_rejected() {
        let args = ["a".to_owned(), "b".to_owned()].into_iter();
        assert!(read_password(args, "".as_bytes()).is_err());
    }

    #[rstest]
    fn printed_hash_verifies() {
        let hash = PasswordHash::generate_with_cost("devdojo", 4).expect("hash");
        let parsed: PasswordHash = hash.to_string().parse().expect("round trip");
        assert!(parsed.verify("devdojo"));
    }
}
