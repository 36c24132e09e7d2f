/// Identifies the screen instance that issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewTicket(u64);

/// Advances on every navigation so results for a screen that is no longer
/// shown can be recognised and dropped.
#[derive(Debug, Default)]
pub struct ViewEpoch {
    current: u64,
}

impl ViewEpoch {
    pub fn advance(&mut self) -> ViewTicket {
        self.current += 1;
        ViewTicket(self.current)
    }

    pub fn ticket(&self) -> ViewTicket {
        ViewTicket(self.current)
    }

    pub fn is_current(&self, ticket: ViewTicket) -> bool {
        ticket.0 == self.current
    }
}
