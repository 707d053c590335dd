//! The interactive console.
//!
//! Stands in for the app's three screens: the sign-in and sign-up forms,
//! the home list of users and groups, and the chat view. Live lists are
//! kept current by background tasks that own their subscriptions and close
//! them when stopped.

use crate::command::{Command, HELP};
use crate::error::ConsoleError;
use futures::StreamExt;
use pingster_auth::{AccountService, AuthMode, AuthProvider, Credentials, Identity};
use pingster_conversation::{
    ChatService, ChatTarget, ConversationError, Directory, Draft, ImageAttachment, MessageThread,
    Selection,
};
use pingster_core::{Email, Subscription};
use pingster_store::{DocumentStore, Snapshot};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Alert title for validation and backend failures.
pub const ERROR: &str = "Error";
/// Alert title for authentication failures.
pub const AUTH_ERROR: &str = "Auth Error";
/// Alert title for image attachment failures.
pub const IMAGE_ERROR: &str = "Image Error";

/// Line-oriented console output.
///
/// Lines are queued to whoever holds the receiver; background tasks write
/// through clones.
#[derive(Debug, Clone)]
pub struct Output {
    sender: mpsc::UnboundedSender<String>,
}

impl Output {
    /// Creates an output and the receiver its lines arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Writes a line. Lines written after the receiver is gone are dropped.
    pub fn line(&self, line: impl Into<String>) {
        let _ = self.sender.send(line.into());
    }

    /// Writes an alert with a title.
    pub fn alert(&self, title: &str, message: impl fmt::Display) {
        self.line(format!("[{title}] {message}"));
    }
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop reading input.
    Quit,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A spawned task with a stop signal.
struct Background {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Background {
    fn spawn<F>(task: impl FnOnce(oneshot::Receiver<()>) -> F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (stop, stopped) = oneshot::channel();
        Self {
            stop,
            handle: tokio::spawn(task(stopped)),
        }
    }

    async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "background task failed");
        }
    }
}

/// The chat currently on screen.
struct OpenChat {
    target: ChatTarget,
    thread: Arc<Mutex<MessageThread>>,
    view: Background,
}

/// State that exists while someone is signed in.
struct Session<S> {
    chat: ChatService<S>,
    directory: Arc<Mutex<Directory>>,
    selection: Selection,
    watcher: Background,
    open: Option<OpenChat>,
}

impl<S: DocumentStore> Session<S> {
    async fn start(
        chat: ChatService<S>,
        output: &Output,
    ) -> pingster_core::Result<Self, ConversationError> {
        let users = chat.subscribe_users().await?;
        let groups = chat.subscribe_groups().await?;
        let directory = Arc::new(Mutex::new(Directory::new(chat.me().clone())));

        let watcher = Background::spawn({
            let directory = Arc::clone(&directory);
            let output = output.clone();
            move |stop| watch_directory(users, groups, directory, output, stop)
        });

        Ok(Self {
            chat,
            directory,
            selection: Selection::new(),
            watcher,
            open: None,
        })
    }

    async fn open(&mut self, target: ChatTarget, output: &Output) {
        self.close().await;

        let updates = match self.chat.subscribe_thread(&target.conversation).await {
            Ok(updates) => updates,
            Err(report) => {
                output.alert(ERROR, report);
                return;
            }
        };
        let thread = Arc::new(Mutex::new(MessageThread::new()));
        let view = Background::spawn({
            let thread = Arc::clone(&thread);
            let title = target.title.clone();
            let output = output.clone();
            move |stop| render_thread(updates, thread, title, output, stop)
        });

        info!(conversation = %target.conversation, "opened chat");
        self.open = Some(OpenChat {
            target,
            thread,
            view,
        });
    }

    async fn close(&mut self) -> Option<ChatTarget> {
        let open = self.open.take()?;
        open.view.stop().await;
        Some(open.target)
    }

    async fn end(mut self) {
        self.close().await;
        self.watcher.stop().await;
    }
}

/// The console's state machine.
pub struct Console<A, S> {
    accounts: AccountService<A, S>,
    store: S,
    max_image_bytes: usize,
    output: Output,
    session: Option<Session<S>>,
}

impl<A: AuthProvider, S: DocumentStore + Clone> Console<A, S> {
    /// Creates a console over the given backends.
    #[must_use]
    pub fn new(auth: A, store: S, max_image_bytes: usize, output: Output) -> Self {
        Self {
            accounts: AccountService::new(auth, store.clone()),
            store,
            max_image_bytes,
            output,
            session: None,
        }
    }

    /// Parses and runs one line of input.
    pub async fn execute(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.run(command).await,
            Ok(None) => Flow::Continue,
            Err(e) => {
                self.output.alert(ERROR, e);
                Flow::Continue
            }
        }
    }

    /// Runs a command.
    pub async fn run(&mut self, command: Command) -> Flow {
        debug!(command = command.name(), "running command");
        match command {
            Command::SignUp {
                email,
                password,
                username,
            } => {
                let credentials = Credentials::new(email, password).with_username(username);
                self.sign_up(credentials).await;
            }
            Command::Login { email, password } => {
                self.login(Credentials::new(email, password)).await;
            }
            Command::Logout => self.logout().await,
            Command::Users => self.list_users(),
            Command::Groups => self.list_groups(),
            Command::Select { email } => self.select(Email::new(email)),
            Command::Group { name } => self.create_group(&name).await,
            Command::Dm { email } => self.open_direct(&Email::new(email)).await,
            Command::Open { group } => self.open_group(&group).await,
            Command::Say { text } => self.send(Draft::text(text)).await,
            Command::Image { path } => self.send_image(&path).await,
            Command::Close => self.close().await,
            Command::Help => self.output.line(HELP),
            Command::Quit => {
                self.shutdown().await;
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Stops every background task.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.end().await;
        }
    }

    async fn sign_up(&mut self, credentials: Credentials) {
        if let Err(e) = credentials.validate(AuthMode::SignUp) {
            self.output.alert(ERROR, e);
            return;
        }
        match self.accounts.register(&credentials).await {
            Ok(identity) => {
                self.output.line(format!("Signed up as {}", identity.email()));
                self.start_session(identity).await;
            }
            Err(report) => self.output.alert(AUTH_ERROR, report),
        }
    }

    async fn login(&mut self, credentials: Credentials) {
        if let Err(e) = credentials.validate(AuthMode::SignIn) {
            self.output.alert(ERROR, e);
            return;
        }
        match self.accounts.login(&credentials).await {
            Ok(identity) => {
                self.output.line(format!("Signed in as {}", identity.email()));
                self.start_session(identity).await;
            }
            Err(report) => self.output.alert(AUTH_ERROR, report),
        }
    }

    async fn logout(&mut self) {
        self.shutdown().await;
        match self.accounts.logout().await {
            Ok(()) => self.output.line("Signed out"),
            Err(report) => self.output.alert(AUTH_ERROR, report),
        }
    }

    async fn start_session(&mut self, identity: Identity) {
        self.shutdown().await;

        // Messages are signed with the account email, however the session began.
        let email = identity.email().clone();
        let chat = ChatService::new(self.store.clone(), email.clone())
            .with_display_name(email.as_str());
        match Session::start(chat, &self.output).await {
            Ok(session) => self.session = Some(session),
            Err(report) => self.output.alert(ERROR, report),
        }
    }

    fn list_users(&self) {
        let Some(session) = &self.session else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let directory = lock(&session.directory);
        if directory.is_loading() {
            self.output.line("Loading...");
            return;
        }
        if directory.users().is_empty() {
            self.output.line("No other users yet");
        }
        for user in directory.users() {
            let mark = if session.selection.contains(&user.email) {
                "[x]"
            } else {
                "[ ]"
            };
            self.output.line(format!(
                "{mark} {} {} <{}>",
                user.avatar_initial().unwrap_or(' '),
                user.display_name(),
                user.email
            ));
        }
    }

    fn list_groups(&self) {
        let Some(session) = &self.session else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let directory = lock(&session.directory);
        if directory.is_loading() {
            self.output.line("Loading...");
            return;
        }
        if directory.groups().is_empty() {
            self.output.line("No groups yet");
        }
        for group in directory.groups() {
            self.output.line(format!(
                "{} {} ({} members) {}",
                group.avatar_initial().unwrap_or(' '),
                group.name,
                group.member_count(),
                group.group_id
            ));
        }
    }

    fn select(&mut self, email: Email) {
        let Some(session) = self.session.as_mut() else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let email = match lock(&session.directory).find_user(&email) {
            Some(user) => user.email.clone(),
            None => {
                self.output.alert(
                    ERROR,
                    ConsoleError::UnknownUser {
                        email: email.to_string(),
                    },
                );
                return;
            }
        };
        let verb = if session.selection.toggle(email.clone()) {
            "Selected"
        } else {
            "Unselected"
        };
        self.output.line(format!(
            "{verb} {email} ({} selected)",
            session.selection.len()
        ));
    }

    async fn create_group(&mut self, name: &str) {
        let Some(session) = self.session.as_mut() else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        match session.chat.create_group(name, &session.selection).await {
            Ok(group) => {
                session.selection.clear();
                self.output.line(format!("Created group {}", group.name));
                let target = lock(&session.directory).open_group(&group);
                session.open(target, &self.output).await;
            }
            Err(report) => self.output.alert(ERROR, report),
        }
    }

    async fn open_direct(&mut self, email: &Email) {
        let Some(session) = self.session.as_mut() else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let target = {
            let directory = lock(&session.directory);
            directory.find_user(email).map(|user| directory.open_user(user))
        };
        match target {
            Some(target) => session.open(target, &self.output).await,
            None => self.output.alert(
                ERROR,
                ConsoleError::UnknownUser {
                    email: email.to_string(),
                },
            ),
        }
    }

    async fn open_group(&mut self, key: &str) {
        let Some(session) = self.session.as_mut() else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let target = {
            let directory = lock(&session.directory);
            directory.find_group(key).map(|group| directory.open_group(group))
        };
        match target {
            Some(target) => session.open(target, &self.output).await,
            None => self.output.alert(
                ERROR,
                ConsoleError::UnknownGroup {
                    key: key.to_string(),
                },
            ),
        }
    }

    async fn send(&mut self, draft: Draft) {
        let Some(session) = self.session.as_mut() else {
            self.output.alert(ERROR, ConsoleError::NotSignedIn);
            return;
        };
        let Some(open) = &session.open else {
            self.output.alert(ERROR, ConsoleError::NoOpenChat);
            return;
        };
        match session.chat.submit(&open.target.conversation, draft).await {
            Ok(message) => {
                let lines = {
                    let mut thread = lock(&open.thread);
                    thread.echo(message);
                    render(&open.target.title, &thread)
                };
                for line in lines {
                    self.output.line(line);
                }
            }
            Err(report) => self.output.alert(ERROR, report),
        }
    }

    async fn send_image(&mut self, path: &str) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.output.alert(
                    IMAGE_ERROR,
                    ConsoleError::ReadImage {
                        path: path.to_string(),
                        reason: e.to_string(),
                    },
                );
                return;
            }
        };
        match ImageAttachment::from_jpeg(&bytes, self.max_image_bytes) {
            Ok(image) => self.send(Draft::image(image)).await,
            Err(e) => self.output.alert(IMAGE_ERROR, e),
        }
    }

    async fn close(&mut self) {
        let closed = match self.session.as_mut() {
            Some(session) => session.close().await,
            None => None,
        };
        match closed {
            Some(target) => self.output.line(format!("Closed {}", target.title)),
            None => self.output.alert(ERROR, ConsoleError::NoOpenChat),
        }
    }
}

/// Keeps the directory current until stopped.
async fn watch_directory(
    mut users: Subscription<Snapshot>,
    mut groups: Subscription<Snapshot>,
    directory: Arc<Mutex<Directory>>,
    output: Output,
    mut stop: oneshot::Receiver<()>,
) {
    let mut users_loaded = false;
    let mut announced = false;
    loop {
        let mut lines = Vec::new();
        tokio::select! {
            _ = &mut stop => break,
            Some(snapshot) = users.next() => {
                let mut directory = lock(&directory);
                let known: HashSet<Email> =
                    directory.users().iter().map(|u| u.email.clone()).collect();
                directory.apply_users(&snapshot);
                if users_loaded {
                    for user in directory.users().iter().filter(|u| !known.contains(&u.email)) {
                        lines.push(format!("{} joined", user.display_name()));
                    }
                }
                users_loaded = true;
            }
            Some(snapshot) = groups.next() => {
                let mut directory = lock(&directory);
                let first = directory.is_loading();
                let known: HashSet<String> = directory
                    .groups()
                    .iter()
                    .map(|g| g.group_id.to_string())
                    .collect();
                directory.apply_groups(&snapshot);
                if !first {
                    for group in directory
                        .groups()
                        .iter()
                        .filter(|g| !known.contains(g.group_id.as_str()))
                    {
                        lines.push(format!("Added to group {}", group.name));
                    }
                }
            }
            else => break,
        }

        if !announced && users_loaded {
            let directory = lock(&directory);
            if !directory.is_loading() {
                announced = true;
                lines.insert(
                    0,
                    format!(
                        "Loaded {} users and {} groups",
                        directory.users().len(),
                        directory.groups().len()
                    ),
                );
            }
        }
        for line in lines {
            output.line(line);
        }
    }

    users.close();
    groups.close();
    debug!("stopped directory watcher");
}

/// Renders every delivered snapshot of a thread until stopped.
async fn render_thread(
    mut updates: Subscription<Snapshot>,
    thread: Arc<Mutex<MessageThread>>,
    title: String,
    output: Output,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut stop => break,
            update = updates.next() => {
                let Some(snapshot) = update else { break };
                let lines = {
                    let mut thread = lock(&thread);
                    thread.apply_snapshot(&snapshot);
                    render(&title, &thread)
                };
                for line in lines {
                    output.line(line);
                }
            }
        }
    }

    updates.close();
    debug!(%title, "stopped chat view");
}

fn render(title: &str, thread: &MessageThread) -> Vec<String> {
    let mut lines = vec![format!("== {title} ==")];
    for message in thread.messages() {
        let sender = message
            .user
            .name
            .as_deref()
            .unwrap_or(message.user.id.as_str());
        let body = match (message.text.is_empty(), message.has_image()) {
            (false, true) => format!("{} [image]", message.text),
            (true, true) => "[image]".to_string(),
            _ => message.text.clone(),
        };
        let pending = if thread.is_pending(&message.id) {
            " (sending)"
        } else {
            ""
        };
        lines.push(format!("{sender}: {body}{pending}"));
    }
    lines
}
