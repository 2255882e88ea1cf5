//! Catalogue of bundled `.reg` tweaks and their import.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::exec::Executor;

/// Folder under the assets directory holding the `.reg` files.
pub const REG_DIR: &str = "RegFiles";

/// A titled group of tweaks, shown together in the selection list.
#[derive(Debug, Clone, Copy)]
pub struct RegPage {
    /// Group title.
    pub title: &'static str,
    /// File stems of the `.reg` files in this group.
    pub tweaks: &'static [&'static str],
}

/// Every bundled tweak, grouped by page.
pub const PAGES: &[RegPage] = &[
    RegPage {
        title: "Windows",
        tweaks: &[
            "DisableCopilot",
            "EnableCopilot",
            "DisableAIRecall",
            "EnableAIRecall",
            "DisableTelemetry",
            "EnableTelemetry",
            "DisableWindowsSuggestions",
            "EnableWindowsSuggestions",
            "EnableDarkMode",
            "EnableLightMode",
            "DisableBingCortanaInSearch",
            "EnableBingCortanaInSearch",
            "DisableDVR",
            "EnableDVR",
            "DisableLockscreenTips",
            "EnableLockscreenTips",
            "DisableEnhancePointerPrecision",
        ],
    },
    RegPage {
        title: "Context Menu",
        tweaks: &[
            "EnableWin10Context",
            "DisableWin10Context",
            "DisableGiveaccesstocontextmenu",
            "EnableGiveaccesstocontextmenu",
            "DisableIncludeinlibraryfromcontextmenu",
            "EnableIncludeinlibrarytocontextmenu",
            "DisableSharefromcontextmenu",
            "EnableSharetocontextmenu",
            "DisableShowMoreOptionsContextMenu",
            "EnableShowMoreOptionsContextMenu",
        ],
    },
    RegPage {
        title: "Taskbar",
        tweaks: &[
            "HideSearchTaskbar",
            "ShowSearchBox",
            "ShowSearchIcon",
            "ShowSearchIconAndLabel",
            "HideTaskviewTaskbar",
            "ShowTaskviewTaskbar",
            "DisableWidgetsTaskbar",
            "EnableWidgetsTaskbar",
            "AlignTaskbarLeft",
            "AlignTaskbarCenter",
            "DisableChatTaskbar",
            "EnableChatTaskbar",
        ],
    },
    RegPage {
        title: "Explorer",
        tweaks: &[
            "HideduplicateremovabledrivesfromnavigationpaneofFileExplorer",
            "ShowduplicateremovabledrivesfromnavigationpaneofFileExplorer",
            "HideExtensionsForKnownFileTypes",
            "ShowExtensionsForKnownFileTypes",
            "ShowHiddenFolders",
            "HideHiddenFolders",
            "Hide3DObjectsFolder",
            "Show3DObjectsFolder",
            "HideGalleryfromExplorer",
            "ShowGalleryinExplorer",
            "HideMusicFolder",
            "ShowMusicFolder",
            "HideOnedriveFolder",
            "ShowOnedrivefolder",
        ],
    },
];

/// All tweaks in display order, paired with their page title.
pub fn all() -> impl Iterator<Item = (&'static str, &'static str)> {
    PAGES
        .iter()
        .flat_map(|page| page.tweaks.iter().map(move |t| (page.title, *t)))
}

/// Look up a tweak by name, ignoring case and an optional `.reg` suffix.
#[must_use]
pub fn find(name: &str) -> Option<&'static str> {
    let name = name.trim();
    let stem = name
        .strip_suffix(".reg")
        .or_else(|| name.strip_suffix(".REG"))
        .unwrap_or(name);
    all()
        .map(|(_, tweak)| tweak)
        .find(|tweak| tweak.eq_ignore_ascii_case(stem))
}

/// Path of the `.reg` file for `tweak` under `assets`.
#[must_use]
pub fn reg_file(assets: &Path, tweak: &str) -> PathBuf {
    assets.join(REG_DIR).join(format!("{tweak}.reg"))
}

/// Silently import a `.reg` file.
///
/// # Errors
///
/// Returns an error if `regedit` fails.
pub fn import(executor: &dyn Executor, file: &Path) -> Result<()> {
    let file_arg = file.to_string_lossy();
    executor
        .run("regedit.exe", &["/s", &file_arg])
        .with_context(|| format!("importing {}", file.display()))?;
    Ok(())
}
