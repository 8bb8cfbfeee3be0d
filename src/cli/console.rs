use crate::portal::{Navigator, Notifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, description: &str) {
        println!("[{}] {}", title, description);
    }
}

/// Prints each navigation; the shell has no page to move to.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, destination: &str) {
        println!("-> {}", destination);
    }
}
