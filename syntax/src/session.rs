use tracing::{debug, instrument};

use crate::{
    execution::ExecutionContext, Board, CharSource, Compiler, ConfigError, DispatchStats, Engine,
    Formatter, LineCursor, PinRegistry, Program, ProtocolDriver, SessionConfig, SyntaxError, Trace,
};

/// Everything one submitted line produced.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub program: Program,
    pub trace: Trace,
    pub text: String,
}

/// Runs lines of bus syntax through compile, run and format.
///
/// The session owns the configuration and the pin table, so aux pins claimed
/// by one line stay claimed for the next.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    pins: PinRegistry,
    engine: Engine,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pins: PinRegistry::new(config.pin_count),
            engine: Engine::new(config.capacity),
            config,
        })
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn pins(&self) -> &PinRegistry {
        &self.pins
    }

    /// Pin table access for whoever sets up the bus mode.
    pub fn pins_mut(&mut self) -> &mut PinRegistry {
        &mut self.pins
    }

    pub const fn stats(&self) -> &DispatchStats {
        self.engine.stats()
    }

    pub fn run_line(
        &mut self,
        line: &str,
        driver: &mut dyn ProtocolDriver,
        board: &mut dyn Board,
    ) -> Result<SessionOutput, SyntaxError> {
        self.run(&mut LineCursor::new(line), driver, board)
    }

    /// Compiles what is left in `src`, runs it and renders the results.
    ///
    /// A compile error means nothing ran. A runtime error is not an `Err`: the
    /// trace stops at the failing entry and the output shows its message.
    #[instrument(level = "debug", skip_all, fields(driver = driver.name()))]
    pub fn run<S>(
        &mut self,
        src: &mut S,
        driver: &mut dyn ProtocolDriver,
        board: &mut dyn Board,
    ) -> Result<SessionOutput, SyntaxError>
    where
        S: CharSource + ?Sized,
    {
        driver.preflight();

        let program = Compiler::new(&self.config, &self.pins).compile(src)?;
        if program.is_empty() {
            return Err(SyntaxError::EmptyProgram);
        }

        let trace = {
            let mut ctx = ExecutionContext::new(driver, board, &mut self.pins);
            self.engine.run(&program, &mut ctx)
        };
        driver.wait_done();
        debug!(entries = trace.len(), halted = trace.halted(), "executed");

        let text = Formatter::new(&self.config).format(&trace);
        Ok(SessionOutput {
            program,
            trace,
            text,
        })
    }
}
