use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:ring-ring/50 focus-visible:ring-[3px] hover:cursor-pointer select-none",
        variants: {
            variant: {
                Default: "bg-blue-500 text-white shadow-xs hover:bg-blue-600",
                Secondary: "bg-gray-300 text-black shadow-xs hover:bg-gray-400/80",
                Outline: "border bg-transparent shadow-xs hover:bg-gray-100",
                Ghost: "text-muted-foreground hover:bg-gray-100 hover:text-foreground",
            },
            size: {
                Default: "h-9 px-4 py-2",
                Sm: "h-8 gap-1.5 px-3",
                Icon: "size-8",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
