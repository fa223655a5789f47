//! src/email/message.rs
use crate::domain::SubscriberEmail;
use lettre::message::Mailbox;

/// Who receives a single outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Everything goes to one test inbox instead of the real list.
    Override(SubscriberEmail),
    /// Every address is a blind copy; nobody sees anybody else's address.
    Blind(Vec<SubscriberEmail>),
}

impl Recipients {
    pub fn addresses(&self) -> Vec<&SubscriberEmail> {
        match self {
            Recipients::Override(address) => vec![address],
            Recipients::Blind(addresses) => addresses.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Recipients::Override(_) => 1,
            Recipients::Blind(addresses) => addresses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Recipients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let addresses: Vec<&str> = self.addresses().into_iter().map(|a| a.as_ref()).collect();
        write!(f, "{}", addresses.join(", "))
    }
}

#[derive(Debug)]
pub struct Email<'a> {
    pub sender: &'a Mailbox,
    pub recipients: &'a Recipients,
    pub subject: &'a str,
    pub text_content: &'a str,
    pub html_content: &'a str,
}

pub struct EmailBuilder<'a> {
    sender: &'a Mailbox,
    recipients: &'a Recipients,
    subject: &'a str,
    text_content: &'a str,
    html_content: &'a str,
}

impl<'a> EmailBuilder<'a> {
    pub fn new(sender: &'a Mailbox, recipients: &'a Recipients) -> Self {
        Self {
            sender,
            recipients,
            subject: "",
            text_content: "",
            html_content: "",
        }
    }

    pub fn subject(mut self, subject: &'a str) -> Self {
        self.subject = subject;
        self
    }

    pub fn text_content(mut self, text_content: &'a str) -> Self {
        self.text_content = text_content;
        self
    }

    pub fn html_content(mut self, html_content: &'a str) -> Self {
        self.html_content = html_content;
        self
    }

    pub fn build(self) -> Email<'a> {
        Email {
            sender: self.sender,
            recipients: self.recipients,
            subject: self.subject,
            text_content: self.text_content,
            html_content: self.html_content,
        }
    }
}
