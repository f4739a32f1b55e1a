//! Fake platform-tools for driving the real binary end to end
//!
//! `adb` and `fastboot` are small shell scripts that answer for up to two
//! devices and keep each bootloader lock state in a file, so a full
//! unlock/flash/lock run can be observed without hardware. Like the real
//! fastboot, the fake one targets `-s <serial>` or else `$ANDROID_SERIAL`.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SERIAL: &str = "8AAY0GK9A";
pub const SECOND_SERIAL: &str = "FA79X1A00123";
pub const CODENAME: &str = "crosshatch";

/// Which tool should report the fake device
#[derive(Clone, Copy)]
pub enum AttachedVia {
    Adb,
    Fastboot,
    /// `SERIAL` and `SECOND_SERIAL`, both in bootloader mode
    TwoInFastboot,
    Nothing,
}

pub struct FakeDeviceEnvironment {
    pub temp_dir: TempDir,
}

impl FakeDeviceEnvironment {
    pub fn new(attached: AttachedVia) -> Self {
        let env = Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        };
        fs::create_dir_all(env.tools_dir()).unwrap();
        fs::create_dir_all(env.work_dir()).unwrap();
        env.write_adb(attached);
        env.write_fastboot(attached);
        for serial in [SERIAL, SECOND_SERIAL] {
            env.set_unlocked_for(serial, false);
        }
        env
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.temp_dir.path().join("platform-tools")
    }

    /// Empty working directory so no device-flasher.toml is picked up
    pub fn work_dir(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    pub fn set_unlocked(&self, unlocked: bool) {
        self.set_unlocked_for(SERIAL, unlocked);
    }

    pub fn set_unlocked_for(&self, serial: &str, unlocked: bool) {
        let value = if unlocked { "yes" } else { "no" };
        fs::write(self.lock_file(serial), format!("{value}\n")).unwrap();
    }

    pub fn unlocked(&self) -> String {
        self.unlocked_for(SERIAL)
    }

    pub fn unlocked_for(&self, serial: &str) -> String {
        fs::read_to_string(self.lock_file(serial))
            .unwrap()
            .trim()
            .to_string()
    }

    fn lock_file(&self, serial: &str) -> PathBuf {
        self.tools_dir().join(format!("unlocked-{serial}"))
    }

    pub fn fastboot_log(&self) -> Vec<String> {
        read_lines(&self.tools_dir().join("fastboot.log"))
    }

    /// Serials flash-all ran against, in the order the runs finished
    pub fn flashed_serials(&self, image: &Path) -> Vec<String> {
        read_lines(&image.join("flashed"))
    }

    pub fn adb_log(&self) -> Vec<String> {
        read_lines(&self.tools_dir().join("adb.log"))
    }

    /// Extracted factory image whose flash-all.sh exits with `exit_code`.
    ///
    /// Like a real flash-all it never passes `-s`; each run appends the
    /// serial fastboot flashed to `flashed` in the image directory.
    pub fn factory_image(&self, codename: &str, exit_code: i32) -> PathBuf {
        let dir = self.temp_dir.path().join(format!("{codename}-tq3a.230901.001"));
        fs::create_dir_all(&dir).unwrap();
        let script = format!(
            "#!/bin/sh\n\
             out=$(fastboot flash-all-marker) || exit 1\n\
             echo \"$out\" >> flashed\n\
             exit {exit_code}\n"
        );
        write_executable(&dir.join("flash-all.sh"), &script);
        dir
    }

    fn write_adb(&self, attached: AttachedVia) {
        let listed = match attached {
            AttachedVia::Adb => format!("{SERIAL}\\tdevice\\n"),
            _ => String::new(),
        };
        let script = format!(
            "#!/bin/sh\n\
             dir=$(dirname \"$0\")\n\
             echo \"$*\" >> \"$dir/adb.log\"\n\
             case \"$*\" in\n\
               \"devices\") printf 'List of devices attached\\n{listed}\\n' ;;\n\
               \"-s {SERIAL} shell getprop ro.product.device\") echo {CODENAME} ;;\n\
               \"-s {SERIAL} reboot bootloader\") ;;\n\
               \"kill-server\") ;;\n\
               *) exit 1 ;;\n\
             esac\n"
        );
        write_executable(&self.tools_dir().join("adb"), &script);
    }

    fn write_fastboot(&self, attached: AttachedVia) {
        let devices = match attached {
            AttachedVia::Fastboot => format!("printf '{SERIAL}\\tfastboot\\n'"),
            AttachedVia::TwoInFastboot => {
                format!("printf '{SERIAL}\\tfastboot\\n{SECOND_SERIAL}\\tfastboot\\n'")
            }
            // an adb device only shows up here after rebooting to the bootloader
            _ => "true".to_string(),
        };
        let script = format!(
            "#!/bin/sh\n\
             dir=$(dirname \"$0\")\n\
             serial=\"$ANDROID_SERIAL\"\n\
             if [ \"$1\" = \"-s\" ]; then serial=\"$2\"; shift 2; fi\n\
             echo \"$serial: $*\" >> \"$dir/fastboot.log\"\n\
             if [ \"$*\" != \"devices\" ] && [ ! -f \"$dir/unlocked-$serial\" ]; then exit 1; fi\n\
             case \"$*\" in\n\
               \"devices\") {devices} ;;\n\
               \"getvar product\") echo \"product: {CODENAME}\" >&2 ;;\n\
               \"getvar unlocked\") echo \"unlocked: $(cat \"$dir/unlocked-$serial\")\" >&2 ;;\n\
               \"flashing unlock\") echo yes > \"$dir/unlocked-$serial\" ;;\n\
               \"flashing lock\") echo no > \"$dir/unlocked-$serial\" ;;\n\
               \"flash-all-marker\") echo \"$serial\" ;;\n\
               \"reboot\") ;;\n\
               *) exit 1 ;;\n\
             esac\n"
        );
        write_executable(&self.tools_dir().join("fastboot"), &script);
    }
}

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    let mut permissions = fs::metadata(path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
