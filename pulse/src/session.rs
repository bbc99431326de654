// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! A ready-to-use connection: a running mainloop plus a ready context.

use crate::{
    Context, MainloopGuard, Result, SinkInfo, ThreadedMainloop, api::PulseApiHandle,
};

/// A mainloop and a context connected on it.
///
/// This is the usual entry point. It performs the libpulse connection
/// handshake in the documented order: create the loop, create the context,
/// start connecting, start the loop thread, then wait with the lock held until
/// the context is ready.
pub struct Session {
    // Field order is drop order: the context disconnects before the last
    // mainloop reference goes away.
    context: Context,
    mainloop: ThreadedMainloop,
}

impl Session {
    /// Connects to `server`, or to the default server when `None`.
    ///
    /// # Arguments
    ///
    /// * `api` - Loaded libpulse (from [`crate::load_api`])
    /// * `client_name` - Application name shown by the server
    /// * `server` - Server address such as `unix:/run/user/1000/pulse/native`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ContextFailed`] if the server refuses the
    /// connection, or any error from creating the mainloop or context.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pulse::{Session, config::pulse_library_path, load_api};
    ///
    /// # fn main() -> Result<(), pulse::Error> {
    /// let api = load_api(pulse_library_path())?;
    /// let session = Session::connect(api, "my-player", None)?;
    /// for sink in session.sinks()? {
    ///     println!("{}: {}", sink.name, sink.description);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(api: PulseApiHandle, client_name: &str, server: Option<&str>) -> Result<Self> {
        let mainloop = ThreadedMainloop::new(api)?;
        let context = Context::new(&mainloop, client_name)?;
        {
            let guard = mainloop.lock();
            context.connect(&guard, server)?;
        }
        mainloop.start()?;
        {
            let guard = mainloop.lock();
            context.wait_ready(&guard)?;
        }
        tracing::debug!(
            "Connected to {} as {client_name}",
            server.unwrap_or("default server")
        );
        Ok(Self { context, mainloop })
    }

    pub fn lock(&self) -> MainloopGuard<'_> {
        self.mainloop.lock()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn mainloop(&self) -> &ThreadedMainloop {
        &self.mainloop
    }

    pub fn api(&self) -> &PulseApiHandle {
        self.mainloop.api()
    }

    /// Lists the server's sinks.
    pub fn sinks(&self) -> Result<Vec<SinkInfo>> {
        let guard = self.lock();
        self.context.sink_info_list(&guard)
    }
}
