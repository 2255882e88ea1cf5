//! Catalogue of removable bundled applications and their removal.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::powershell::PowerShell;
use crate::exec::Executor;

/// Package id whose removal runs the bundled Edge remover.
pub const EDGE_ID: &str = "Microsoft.Edge";
/// Package id whose removal runs the bundled OneDrive uninstall script.
pub const ONEDRIVE_ID: &str = "Microsoft.OneDrive";

const EDGE_REMOVER: &str = "RemoveEdgeOnly.exe";
const ONEDRIVE_SCRIPT: &str = "uninstallOneDrive.ps1";

/// A removable application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloatApp {
    /// Name shown in the selection list.
    pub label: &'static str,
    /// AppX package name (or one of the special ids).
    pub id: &'static str,
}

const fn app(label: &'static str, id: &'static str) -> BloatApp {
    BloatApp { label, id }
}

/// Every application offered for removal, in display order.
pub const CATALOGUE: &[BloatApp] = &[
    app("Edge browser", EDGE_ID),
    app("OneDrive", ONEDRIVE_ID),
    app("Clipchamp", "Clipchamp.Clipchamp"),
    app("3D Builder", "Microsoft.3DBuilder"),
    app("Finance", "Microsoft.BingFinance"),
    app("Food and Drink", "Microsoft.BingFoodAndDrink"),
    app("Health and Fitness", "Microsoft.BingHealthAndFitness"),
    app("News", "Microsoft.News"),
    app("Bing News", "Microsoft.BingNews"),
    app("Sports", "Microsoft.BingSports"),
    app("Translator", "Microsoft.BingTranslator"),
    app("Travel", "Microsoft.BingTravel"),
    app("Weather", "Microsoft.BingWeather"),
    app("Messaging", "Microsoft.Messaging"),
    app("3D Viewer", "Microsoft.Microsoft3DViewer"),
    app("Office Hub", "Microsoft.MicrosoftOfficeHub"),
    app("Power BI", "Microsoft.MicrosoftPowerBIForWindows"),
    app("Solitaire Collection", "Microsoft.MicrosoftSolitaireCollection"),
    app("Sticky Notes", "Microsoft.MicrosoftStickyNotes"),
    app("Mixed Reality Portal", "Microsoft.MixedReality.Portal"),
    app("Network Speed Test", "Microsoft.NetworkSpeedTest"),
    app("OneNote", "Microsoft.Office.OneNote"),
    app("Sway", "Microsoft.Office.Sway"),
    app("OneConnect", "Microsoft.OneConnect"),
    app("Print 3D", "Microsoft.Print3D"),
    app("Skype", "Microsoft.SkypeApp"),
    app("To-Do", "Microsoft.Todos"),
    app("Alarms", "Microsoft.WindowsAlarms"),
    app("Feedback Hub", "Microsoft.WindowsFeedbackHub"),
    app("Maps", "Microsoft.WindowsMaps"),
    app("Sound Recorder", "Microsoft.WindowsSoundRecorder"),
    app("Movies & TV", "Microsoft.ZuneVideo"),
    app("Family", "MicrosoftCorporationII.MicrosoftFamily"),
    app("Teams", "MicrosoftTeams"),
    app("Get Help", "Microsoft.GetHelp"),
    app("MS Paint", "Microsoft.MSPaint"),
    app("Paint", "Microsoft.Paint"),
    app("Whiteboard", "Microsoft.Whiteboard"),
    app("Photos", "Microsoft.Windows.Photos"),
    app("Calculator", "Microsoft.WindowsCalculator"),
    app("Camera", "Microsoft.WindowsCamera"),
    app("Your Phone", "Microsoft.YourPhone"),
    app("Music", "Microsoft.ZuneMusic"),
    app("Gaming App", "Microsoft.GamingApp"),
    app("Outlook", "Microsoft.OutlookForWindows"),
    app("People", "Microsoft.People"),
    app("Power Automate Desktop", "Microsoft.PowerAutomateDesktop"),
    app("Mail and Calendar", "Microsoft.windowscommunicationsapps"),
    app("Xbox Game Overlay", "Microsoft.XboxGameOverlay"),
    app("Xbox Gaming Overlay", "Microsoft.XboxGamingOverlay"),
    app("Dev Home", "Windows.DevHome"),
];

/// Look up an application by package id, ignoring case.
#[must_use]
pub fn find(id: &str) -> Option<&'static BloatApp> {
    let id = id.trim();
    CATALOGUE.iter().find(|a| a.id.eq_ignore_ascii_case(id))
}

/// How an application is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Run a bundled executable from the assets directory.
    Executable(&'static str),
    /// Run a bundled PowerShell script from the assets directory.
    Script(&'static str),
    /// Remove the installed and provisioned AppX packages.
    Appx(String),
}

impl BloatApp {
    /// The removal method for this application.
    #[must_use]
    pub fn removal(&self) -> Removal {
        match self.id {
            EDGE_ID => Removal::Executable(EDGE_REMOVER),
            ONEDRIVE_ID => Removal::Script(ONEDRIVE_SCRIPT),
            id => Removal::Appx(appx_removal_script(id)),
        }
    }
}

/// PowerShell removing `id` for every user and from the provisioned image.
#[must_use]
pub fn appx_removal_script(id: &str) -> String {
    format!(
        "Set-ExecutionPolicy -ExecutionPolicy Bypass -Scope Process -Force; \
         Get-AppxPackage -Name \"{id}\" -AllUsers | Remove-AppxPackage; \
         Get-AppxProvisionedPackage -Online | Where-Object {{ $_.PackageName -like \"{id}\" }} | \
         ForEach-Object {{ Remove-ProvisionedAppxPackage -Online -AllUsers -PackageName $_.PackageName }}"
    )
}

/// Remove `app`, resolving bundled removers under `assets`.
///
/// # Errors
///
/// Returns an error if the removal command fails.
pub fn remove(
    shell: &PowerShell,
    executor: &dyn Executor,
    assets: &Path,
    app: &BloatApp,
) -> Result<()> {
    let result = match app.removal() {
        Removal::Executable(name) => {
            let exe = assets.join(name);
            executor.run_attached(&exe.to_string_lossy(), &[])
        }
        Removal::Script(name) => shell.run_file(executor, &assets.join(name), &[]),
        Removal::Appx(script) => shell.run(executor, &script).map(|_| ()),
    };
    result.with_context(|| format!("removing {} ({})", app.label, app.id))
}
