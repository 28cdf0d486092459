//! Implementation of the `dl email` command.
//!
//! Exports the report, attaches the spreadsheet to a MIME message and,
//! once the user confirms, submits it over authenticated SMTP or hands it
//! to a sendmail-compatible program.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use dl_core::Report;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Mailboxes, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::Config;
use crate::cli::LogArgs;
use crate::commands::export::write_workbook;
use crate::commands::util::load_report;
use crate::config::{EmailConfig, EmailTransport};

const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Answers that cancel sending.
const DECLINE_ANSWERS: [&str; 4] = ["no", "No", "n", "N"];

/// A composed message with the report spreadsheet attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl EmailMessage {
    /// Builds the message for `report`, attaching the file at `attachment_path`.
    pub fn compose(report: &Report, config: &Config, attachment_path: &Path) -> Result<Self> {
        let subject = report
            .email_subject(&config.user_name)
            .context("report has no entries; nothing to send")?;
        let from = config
            .email
            .from
            .clone()
            .context("email.from is not configured")?;
        let to = config
            .email
            .to
            .clone()
            .context("email.to is not configured")?;
        let attachment = fs::read(attachment_path)
            .with_context(|| format!("failed to read attachment {}", attachment_path.display()))?;
        let attachment_name = attachment_path
            .file_name()
            .map_or_else(|| "output.xlsx".to_string(), |name| name.to_string_lossy().into_owned());

        Ok(Self {
            from,
            to,
            cc: config.email.cc.clone(),
            subject,
            body: config.email.body.clone(),
            attachment_name,
            attachment,
        })
    }

    /// Headers and body as shown before asking to send.
    pub fn preview(&self) -> String {
        let mut out = String::new();
        writeln!(out, "From: {}", self.from).unwrap();
        writeln!(out, "To: {}", self.to).unwrap();
        if let Some(cc) = &self.cc {
            writeln!(out, "Cc: {cc}").unwrap();
        }
        writeln!(out, "Subject: {}", self.subject).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "{}", self.body).unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "[attachment: {} ({} bytes)]",
            self.attachment_name,
            self.attachment.len()
        )
        .unwrap();
        out
    }

    /// The multipart message: a plain-text body and the spreadsheet.
    pub fn to_message(&self) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("invalid sender address {:?}", self.from))?;
        let to: Mailboxes = self
            .to
            .parse()
            .with_context(|| format!("invalid recipient address {:?}", self.to))?;
        let cc: Mailboxes = match &self.cc {
            Some(cc) => cc
                .parse()
                .with_context(|| format!("invalid cc address {cc:?}"))?,
            None => Mailboxes::new(),
        };

        let mut builder = Message::builder().from(from).subject(self.subject.as_str());
        for mailbox in to {
            builder = builder.to(mailbox);
        }
        for mailbox in cc {
            builder = builder.cc(mailbox);
        }

        let content_type = ContentType::parse(XLSX_MIME_TYPE).context("invalid attachment content type")?;
        let attachment = Attachment::new(self.attachment_name.clone()).body(self.attachment.clone(), content_type);

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(self.body.clone()))
                    .singlepart(attachment),
            )
            .context("failed to build email message")
    }
}

/// Asks whether to send. Anything but an explicit no (or end of input) sends.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "Do you want to send this email? [Y/n] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(!DECLINE_ANSWERS.contains(&answer.trim()))
}

/// The delivery channel selected by [`EmailConfig::transport`].
pub enum Mailer {
    Smtp(Box<SmtpTransport>),
    Sendmail { command: String, args: Vec<String> },
}

impl Mailer {
    /// Checks the transport settings and prepares the transport.
    ///
    /// Nothing is contacted until [`Mailer::send`].
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        match config.transport {
            EmailTransport::Sendmail => Ok(Self::Sendmail {
                command: config.command.clone(),
                args: config.args.clone(),
            }),
            EmailTransport::Smtp => {
                let server = config
                    .smtp_server
                    .as_deref()
                    .context("email.smtp_server is not configured")?;
                let username = config
                    .username
                    .clone()
                    .or_else(|| config.from.clone())
                    .context("email.username is not configured")?;
                let password = config
                    .password
                    .clone()
                    .context("email.password is not configured")?;

                let transport = SmtpTransport::starttls_relay(server)
                    .with_context(|| format!("failed to set up TLS for {server}"))?
                    .port(config.port)
                    .credentials(Credentials::new(username, password))
                    .build();
                Ok(Self::Smtp(Box::new(transport)))
            }
        }
    }

    pub fn send(&self, message: &Message) -> Result<()> {
        match self {
            Self::Smtp(transport) => {
                transport.send(message).context("SMTP delivery failed")?;
                Ok(())
            }
            Self::Sendmail { command, args } => pipe_to_command(&message.formatted(), command, args),
        }
    }
}

/// Pipes a rendered message into a sendmail-compatible program.
fn pipe_to_command(message: &[u8], command: &str, args: &[String]) -> Result<()> {
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("failed to start {command}"))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .with_context(|| format!("failed to open stdin of {command}"))?;
        // A mailer that exits early closes the pipe; its exit status says why
        if let Err(err) = stdin.write_all(message) {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(err).with_context(|| format!("failed to write message to {command}"));
            }
        }
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {command}"))?;
    if !status.success() {
        bail!("{command} exited with status {status}");
    }
    Ok(())
}

/// Runs the email command.
pub fn run(args: &LogArgs, config: &Config, output: &Path, yes: bool) -> Result<()> {
    let report = load_report(args, config)?;
    if report.is_empty() {
        bail!("report has no entries; nothing to send");
    }
    let mailer = Mailer::from_config(&config.email)?;

    write_workbook(&report, output)?;
    let email = EmailMessage::compose(&report, config, output)?;
    let message = email.to_message()?;
    print!("{}", email.preview());

    if !yes {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        if !confirm(&mut stdin.lock(), &mut stdout)? {
            eprintln!("Email not sent.");
            return Ok(());
        }
    }

    mailer.send(&message)?;
    tracing::debug!(to = %email.to, subject = %email.subject, transport = ?config.email.transport, "email sent");
    eprintln!("Sent \"{}\" to {}", email.subject, email.to);
    Ok(())
}
