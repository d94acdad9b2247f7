//! Command registry
//!
//! The registry holds every known `CommandDefinition` in registration order
//! and resolves raw ids and long names to them. It is built once and then
//! only read, so a shared reference can be handed to any number of threads.

use heapless::Vec;

use crate::command::{CommandDefinition, CommandSpec, CommandSummary, Keycode, Value};
use crate::codec::ReadOnlyPolicy;
use crate::error::{LookupError, RegistryError};
use crate::listing::CommandList;
use crate::table::COMMAND_TABLE;

/// Maximum commands per registry
pub const MAX_COMMANDS: usize = 32;

/// Length of a raw command id
pub const RAW_ID_LEN: usize = 2;

/// A caller's reference to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandRef<'a> {
    /// Raw two-character id (e.g. `ka`)
    RawId(&'a str),
    /// Readable name (e.g. `power`)
    LongName(&'a str),
}

impl<'a> CommandRef<'a> {
    /// Guess the reference kind from its length
    ///
    /// Raw ids are always two characters and no long name is, so a
    /// two-character reference is taken as a raw id.
    pub fn classify(reference: &'a str) -> Self {
        if reference.chars().count() == RAW_ID_LEN {
            CommandRef::RawId(reference)
        } else {
            CommandRef::LongName(reference)
        }
    }

    pub fn as_str(&self) -> &'a str {
        match *self {
            CommandRef::RawId(s) | CommandRef::LongName(s) => s,
        }
    }
}

/// The fixed set of command definitions
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition, MAX_COMMANDS>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Build the registry from the compiled-in command table
    pub fn new() -> Self {
        let mut commands = Vec::new();
        for spec in COMMAND_TABLE {
            // Capacity and uniqueness are checked by the build script
            let _ = commands.push(CommandDefinition::from_validated(*spec));
        }
        Self { commands }
    }

    /// Build a registry from custom specs
    ///
    /// Raw ids and long names must be unique (case-insensitively), and each
    /// spec must pass [`CommandDefinition::new`].
    pub fn from_specs(specs: &[CommandSpec]) -> Result<Self, RegistryError> {
        let mut commands: Vec<CommandDefinition, MAX_COMMANDS> = Vec::new();

        for spec in specs {
            if commands
                .iter()
                .any(|c| c.raw_id.eq_ignore_ascii_case(spec.raw_id))
            {
                return Err(RegistryError::DuplicateRawId);
            }
            if commands
                .iter()
                .any(|c| c.long_name.eq_ignore_ascii_case(spec.long_name))
            {
                return Err(RegistryError::DuplicateLongName);
            }

            let definition = CommandDefinition::new(*spec)?;
            commands
                .push(definition)
                .map_err(|_| RegistryError::TooManyCommands)?;
        }

        Ok(Self { commands })
    }

    /// Find a command by raw id, ignoring case
    pub fn find_by_raw_id(&self, id: &str) -> Option<&CommandDefinition> {
        self.commands
            .iter()
            .find(|c| c.raw_id.eq_ignore_ascii_case(id))
    }

    /// Find a command by long name, ignoring case
    pub fn find_by_long_name(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands
            .iter()
            .find(|c| c.long_name.eq_ignore_ascii_case(name))
    }

    /// Resolve a tagged command reference
    pub fn resolve(&self, reference: CommandRef<'_>) -> Result<&CommandDefinition, LookupError> {
        let found = match reference {
            CommandRef::RawId(id) => self.find_by_raw_id(id),
            CommandRef::LongName(name) => self.find_by_long_name(name),
        };
        found.ok_or(LookupError::NotFound)
    }

    /// Resolve an untagged reference using [`CommandRef::classify`]
    pub fn resolve_str(&self, reference: &str) -> Result<&CommandDefinition, LookupError> {
        self.resolve(CommandRef::classify(reference))
    }

    /// Resolve a command and decode one of its tokens
    pub fn decode(
        &self,
        reference: CommandRef<'_>,
        raw_token: &str,
    ) -> Result<(&CommandDefinition, Value), LookupError> {
        let command = self.resolve(reference)?;
        let value = command.decode(raw_token)?;
        Ok((command, value))
    }

    /// Resolve a command and encode one of its values
    pub fn encode(
        &self,
        reference: CommandRef<'_>,
        value: &str,
        policy: ReadOnlyPolicy,
    ) -> Result<(&CommandDefinition, Keycode), LookupError> {
        let command = self.resolve(reference)?;
        let keycode = command.encode_with(value, policy)?;
        Ok((command, keycode))
    }

    /// `(raw_id, long_name)` of every command in registration order
    pub fn list_all(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.commands.iter().map(|c| (c.raw_id, c.long_name))
    }

    /// Summaries of every command in registration order
    pub fn summaries(&self) -> impl Iterator<Item = CommandSummary> + '_ {
        self.commands.iter().map(CommandDefinition::summary)
    }

    /// Printable `NAME\tLONG_NAME` table
    pub fn command_list(&self) -> CommandList<'_> {
        CommandList::new(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, EncodeError};

    #[test]
    fn test_builtin_table_loaded() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.len(), 22);
        assert_eq!(registry.list_all().next(), Some(("ka", "power")));
        assert_eq!(registry.list_all().last(), Some(("xb", "input_select")));
    }

    #[test]
    fn test_resolve_by_either_key() {
        let registry = CommandRegistry::new();
        for command in registry.iter() {
            let by_id = registry.resolve(CommandRef::RawId(command.raw_id())).unwrap();
            let by_name = registry
                .resolve(CommandRef::LongName(command.long_name()))
                .unwrap();
            assert_eq!(by_id, command);
            assert_eq!(by_name, command);
            assert_eq!(registry.resolve_str(command.raw_id()).unwrap(), command);
            assert_eq!(registry.resolve_str(command.long_name()).unwrap(), command);
        }
    }

    #[test]
    fn test_resolve_ignores_case() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.resolve_str("KA").unwrap().long_name(), "power");
        assert_eq!(registry.resolve_str("Input_Select").unwrap().raw_id(), "xb");
    }

    #[test]
    fn test_resolve_not_found() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.resolve_str("XY"), Err(LookupError::NotFound));
        assert_eq!(
            registry.resolve_str("totally_unknown_name"),
            Err(LookupError::NotFound)
        );
        assert_eq!(registry.resolve_str(""), Err(LookupError::NotFound));
        // Tagged references do not fall back to the other key
        assert_eq!(
            registry.resolve(CommandRef::LongName("ka")),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            registry.resolve(CommandRef::RawId("power")),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(CommandRef::classify("ka"), CommandRef::RawId("ka"));
        assert_eq!(CommandRef::classify("power"), CommandRef::LongName("power"));
        assert_eq!(CommandRef::classify("k"), CommandRef::LongName("k"));
        assert_eq!(CommandRef::classify("power").as_str(), "power");
    }

    #[test]
    fn test_table_round_trips() {
        let registry = CommandRegistry::new();
        for command in registry.iter().filter(|c| !c.is_slider()) {
            for (token, name) in command.values() {
                assert_eq!(command.decode(token), Ok(Value::Named(name)));
                if !command.is_read_only() {
                    assert_eq!(command.encode(name), Ok(Keycode::Token(token)));
                }
            }
        }
    }

    #[test]
    fn test_builtin_sliders() {
        let registry = CommandRegistry::new();
        let volume = registry.resolve(CommandRef::LongName("volume")).unwrap();
        assert!(volume.is_slider());
        assert_eq!(volume.decode("00"), Ok(Value::Level(0)));
        assert_eq!(volume.decode("64"), Ok(Value::Level(100)));
        assert!(volume.decode("FF").unwrap().is_status());
        assert_eq!(volume.encode("-5").unwrap().to_string(), "0");
        assert_eq!(volume.encode("150").unwrap().to_string(), "64");
        assert_eq!(volume.encode("50").unwrap().to_string(), "32");
    }

    #[test]
    fn test_builtin_read_only() {
        let registry = CommandRegistry::new();
        let state = registry.resolve(CommandRef::RawId("kz")).unwrap();
        assert!(state.is_read_only());
        for value in ["status", "normal", "ac_down", "bogus", ""] {
            assert_eq!(state.encode(value).unwrap().to_string(), "FF");
        }
    }

    #[test]
    fn test_builtin_unknown_token() {
        let registry = CommandRegistry::new();
        let power = registry.resolve(CommandRef::RawId("ka")).unwrap();
        assert_eq!(power.decode("02"), Err(DecodeError::UnknownToken));
        let ir = registry.resolve(CommandRef::RawId("mc")).unwrap();
        assert_eq!(ir.decode("FF"), Err(DecodeError::UnknownToken));
        assert_eq!(ir.decode("0b"), Ok(Value::Named("input")));
    }

    #[test]
    fn test_decode_encode_through_registry() {
        let registry = CommandRegistry::new();

        let (command, value) = registry.decode(CommandRef::RawId("xb"), "90").unwrap();
        assert_eq!(command.long_name(), "input_select");
        assert_eq!(value, Value::Named("hdmi_1"));

        let (command, keycode) = registry
            .encode(CommandRef::LongName("aspect_ratio"), "16:9", ReadOnlyPolicy::Override)
            .unwrap();
        assert_eq!(command.raw_id(), "kc");
        assert_eq!(keycode, Keycode::Token("02"));

        assert_eq!(
            registry.decode(CommandRef::RawId("ka"), "09").unwrap_err(),
            LookupError::Decode(DecodeError::UnknownToken)
        );
        assert_eq!(
            registry
                .encode(CommandRef::RawId("kz"), "normal", ReadOnlyPolicy::Reject)
                .unwrap_err(),
            LookupError::Encode(EncodeError::ReadOnly)
        );
        assert_eq!(
            registry
                .encode(CommandRef::RawId("zz"), "on", ReadOnlyPolicy::Override)
                .unwrap_err(),
            LookupError::NotFound
        );
    }

    #[test]
    fn test_from_specs_rejects_duplicates() {
        static SWITCH: &[(&str, &str)] = &[("00", "off"), ("01", "on")];
        let spec = |raw_id, long_name| CommandSpec {
            raw_id,
            long_name,
            values: SWITCH,
            is_slider: false,
            read_only: false,
        };

        let registry = CommandRegistry::from_specs(&[spec("aa", "first"), spec("bb", "second")])
            .unwrap();
        assert_eq!(registry.len(), 2);

        assert_eq!(
            CommandRegistry::from_specs(&[spec("aa", "first"), spec("AA", "second")]).unwrap_err(),
            RegistryError::DuplicateRawId
        );
        assert_eq!(
            CommandRegistry::from_specs(&[spec("aa", "first"), spec("bb", "first")]).unwrap_err(),
            RegistryError::DuplicateLongName
        );
    }

    #[test]
    fn test_from_specs_rejects_malformed() {
        static WIDE: &[(&str, &str)] = &[("ABC", "wide"), ("01", "on")];
        static SWITCH: &[(&str, &str)] = &[("00", "off"), ("01", "on")];
        let spec = |raw_id, long_name, values| CommandSpec {
            raw_id,
            long_name,
            values,
            is_slider: false,
            read_only: false,
        };

        assert_eq!(
            CommandRegistry::from_specs(&[spec("kax", "television", SWITCH)]).unwrap_err(),
            RegistryError::InvalidRawId
        );
        // Would resolve as a raw id and never be found by name
        assert_eq!(
            CommandRegistry::from_specs(&[spec("ka", "tv", SWITCH)]).unwrap_err(),
            RegistryError::InvalidLongName
        );
        assert_eq!(
            CommandRegistry::from_specs(&[spec("ka", "television", WIDE)]).unwrap_err(),
            RegistryError::InvalidToken
        );

        let registry = CommandRegistry::from_specs(&[spec("ka", "television", SWITCH)]).unwrap();
        assert_eq!(registry.resolve_str("television").unwrap().raw_id(), "ka");
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandRegistry>();

        let registry = CommandRegistry::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let power = registry.resolve_str("power").unwrap();
                    assert_eq!(power.encode("on"), Ok(Keycode::Token("01")));
                });
            }
        });
    }
}
