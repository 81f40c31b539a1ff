//! Background image loading.
//!
//! Reading a file and decoding it happens off the event handlers, so a
//! load is identified by a ticket. Only the most recent ticket can
//! resolve; starting a new load, cancelling, or tearing the host down
//! invalidates whatever was in flight.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LoadTicket(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadOutcome {
    Applied,
    Stale,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct BackgroundLoader {
    generation: u32,
    pending: Option<LoadTicket>,
    closed: bool,
}

impl BackgroundLoader {
    pub fn new() -> Self {
        BackgroundLoader::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = LoadTicket(self.generation);
        if !self.closed {
            self.pending = Some(ticket);
        }
        ticket
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<LoadTicket> {
        self.pending
    }

    /// Single resolution point: consumes the pending ticket if it matches.
    pub fn resolve(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if self.closed {
            return LoadOutcome::Cancelled;
        }
        match self.pending {
            Some(current) if current == ticket => {
                self.pending = None;
                LoadOutcome::Applied
            }
            Some(_) => LoadOutcome::Stale,
            None if ticket.0 == self.generation => LoadOutcome::Cancelled,
            None => LoadOutcome::Stale,
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Teardown; every later `resolve` reports `Cancelled`.
    pub fn close(&mut self) {
        self.pending = None;
        self.closed = true;
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
