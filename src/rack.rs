// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! [InstrumentRack] is the host-facing owner of mounted instruments. It keeps
//! the keyboard routing and the event bus in one place so that a host doesn't
//! have to coordinate them by hand.

use crate::{
    events::{Emitted, EventBus, EventSink},
    input::{InputRouter, KeyInput, PointerInput},
    instruments::AnyInstrument,
    traits::{HasAttributes, Instrument},
    uid::{Uid, UidFactory},
};
use crossbeam_channel::Receiver;
use std::collections::BTreeMap;

/// Owns a set of instruments, the single armed-keyboard reference, and the bus
/// they all emit on.
#[derive(Debug, Default)]
pub struct InstrumentRack {
    uid_factory: UidFactory,
    instruments: BTreeMap<Uid, AnyInstrument>,
    router: InputRouter,
    bus: EventBus,
}
impl InstrumentRack {
    /// Takes ownership of an instrument, connects it to the bus, and returns
    /// the [Uid] that tags its events.
    pub fn mount(&mut self, instrument: impl Into<AnyInstrument>) -> Uid {
        let mut instrument = instrument.into();
        let uid = self.uid_factory.mint_next();
        instrument.attach(self.bus.sink(uid));
        if instrument.is_armed() {
            // Arming only happens through the rack.
            instrument.disarm_keyboard();
        }
        log::debug!("mounting {} as {uid}", instrument.kind());
        self.router.subscribe(uid);
        self.instruments.insert(uid, instrument);
        uid
    }

    /// Removes an instrument and returns it. Anything the user was holding is
    /// released first, so no note is left hanging.
    pub fn unmount(&mut self, uid: Uid) -> Option<AnyInstrument> {
        let mut instrument = self.instruments.remove(&uid)?;
        instrument.auto_release();
        if self.router.routes_to(uid) {
            instrument.disarm_keyboard();
        }
        self.router.unsubscribe(uid);
        instrument.attach(EventSink::default());
        log::debug!("unmounted {} {uid}", instrument.kind());
        Some(instrument)
    }

    /// Mints a sink for a widget that isn't an instrument, such as a
    /// [Dial](crate::dial::Dial), so that it can share the bus.
    pub fn peripheral_sink(&self) -> EventSink {
        self.bus.sink(self.uid_factory.mint_next())
    }

    /// Routes the physical keyboard to `uid`, disarming whatever had it.
    /// Returns false if `uid` isn't mounted.
    pub fn arm(&mut self, uid: Uid) -> bool {
        match self.router.arm(uid) {
            Ok(previous) => {
                if let Some(previous) = previous.and_then(|p| self.instruments.get_mut(&p)) {
                    previous.disarm_keyboard();
                }
                if let Some(instrument) = self.instruments.get_mut(&uid) {
                    instrument.arm_keyboard();
                }
                true
            }
            Err(_) => false,
        }
    }

    /// Stops routing the physical keyboard anywhere.
    pub fn disarm(&mut self) -> Option<Uid> {
        let previous = self.router.disarm();
        if let Some(instrument) = previous.and_then(|uid| self.instruments.get_mut(&uid)) {
            instrument.disarm_keyboard();
        }
        previous
    }

    #[allow(missing_docs)]
    pub fn armed(&self) -> Option<Uid> {
        self.router.armed()
    }

    /// Delivers a key transition to the armed instrument, if any. Returns
    /// whether anyone received it.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        let Some(uid) = self.router.armed() else {
            return false;
        };
        match self.instruments.get_mut(&uid) {
            Some(instrument) => {
                instrument.handle_key(input);
                true
            }
            None => false,
        }
    }

    /// Delivers a pointer transition to one instrument.
    pub fn handle_pointer(&mut self, uid: Uid, input: &PointerInput) {
        if let Some(instrument) = self.instruments.get_mut(&uid) {
            instrument.handle_pointer(input);
        }
    }

    /// Applies an attribute to one instrument. `armed` goes through the rack's
    /// routing so that the one-armed-instrument rule holds.
    pub fn set_attribute(&mut self, uid: Uid, name: &str, value: &str) {
        if name == "armed" {
            if crate::attributes::parse_bool(value) {
                self.arm(uid);
            } else if self.router.routes_to(uid) {
                self.disarm();
            }
        } else if let Some(instrument) = self.instruments.get_mut(&uid) {
            instrument.set_attribute(name, value);
        }
    }

    #[allow(missing_docs)]
    pub fn get(&self, uid: Uid) -> Option<&AnyInstrument> {
        self.instruments.get(&uid)
    }

    /// Gives `f` mutable access to one instrument. Afterward every
    /// instrument's armed flag is brought back in line with the router, so
    /// arming can't happen behind the rack's back.
    pub fn with_instrument<R>(
        &mut self,
        uid: Uid,
        f: impl FnOnce(&mut AnyInstrument) -> R,
    ) -> Option<R> {
        let r = self.instruments.get_mut(&uid).map(f);
        self.sync_armed();
        r
    }

    fn sync_armed(&mut self) {
        let armed = self.router.armed();
        for (uid, instrument) in self.instruments.iter_mut() {
            let should_be_armed = armed == Some(*uid);
            if instrument.is_armed() != should_be_armed {
                log::debug!("resyncing armed state of {uid}");
                if should_be_armed {
                    instrument.arm_keyboard();
                } else {
                    instrument.disarm_keyboard();
                }
            }
        }
    }

    /// Mounted instruments in mount order.
    pub fn iter(&self) -> impl Iterator<Item = (&Uid, &AnyInstrument)> {
        self.instruments.iter()
    }

    #[allow(missing_docs)]
    pub fn uids(&self) -> impl Iterator<Item = &Uid> {
        self.instruments.keys()
    }

    #[allow(missing_docs)]
    pub fn receiver(&self) -> &Receiver<Emitted> {
        self.bus.receiver()
    }

    /// Removes and returns everything emitted since the last drain.
    pub fn drain(&self) -> Vec<Emitted> {
        self.bus.drain()
    }
}
