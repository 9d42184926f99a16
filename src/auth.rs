use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal, Write};
use zeroize::Zeroizing;

pub fn read_username(arg: Option<String>) -> Result<String> {
    //  Argument
    //  credparser make github-bot
    if let Some(name) = arg {
        if !name.is_empty() {
            return Ok(name);
        }
    }

    //  stdin (pipeline) or interactive prompt
    if io::stdin().is_terminal() {
        print!("Username/Label: ");
        io::stdout().flush()?;
    }

    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    let name = buf.trim_end().to_string();

    if name.is_empty() {
        bail!("no username provided");
    }
    Ok(name)
}

pub fn read_password() -> Result<Zeroizing<String>> {
    //  Environment variable
    //  CREDPARSER_PASSWORD="supersecret" credparser make github-bot
    if let Ok(pw) = std::env::var("CREDPARSER_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  stdin (pipeline)
    //  echo "supersecret" | credparser make github-bot
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        let pw = buf.trim_end().to_string();

        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = rpassword::prompt_password("Password/API key: ")?;
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    bail!("no password provided")
}
